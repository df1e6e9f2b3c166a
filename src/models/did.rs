// src/models/did.rs
//! Decentralized Identifier (DID) data model implementation.
//!
//! Defines the subset of a W3C DID Document the linkage verifier reads, following
//! the [DID Core Specification](https://www.w3.org/TR/did-core/).

use crate::error::VerificationError;
use crate::utils::serialization::decode_base64url;
use serde::{Deserialize, Serialize};

/// Service type tag declaring linked web origins.
pub const LINKED_DOMAINS_SERVICE_TYPE: &str = "LinkedDomains";

/// A resolved DID Document.
///
/// Immutable once resolved; the verifier only reads it.
///
/// # DID Format
/// ```text
/// did:<method>:<network>:0x<object-id>
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    /// The complete DID string identifier
    pub id: String,

    /// Verification methods in document order
    #[serde(default)]
    pub verification_method: Vec<VerificationMethod>,

    /// Service entries in document order
    #[serde(default)]
    pub service: Vec<Service>,
}

/// A verification method entry of a DID Document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Key id, usually a DID URL such as `did:example:123#key-1`
    pub id: String,

    /// Method type, e.g. `JsonWebKey2020`
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    /// Public key material as a JWK
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<PublicKeyJwk>,
}

/// Public JSON Web Key (only the members needed for verification).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyJwk {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

/// A service entry of a DID Document.
///
/// `type` may be a single string or an array; `serviceEndpoint` is kept as raw
/// JSON because its shape depends on the service type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,

    #[serde(rename = "type")]
    pub type_: ServiceType,

    pub service_endpoint: serde_json::Value,
}

/// One-or-many service type tag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ServiceType {
    One(String),
    Many(Vec<String>),
}

impl ServiceType {
    /// Returns `true` if the tag (or any tag of the list) equals `wanted`.
    pub fn contains(&self, wanted: &str) -> bool {
        match self {
            ServiceType::One(t) => t == wanted,
            ServiceType::Many(ts) => ts.iter().any(|t| t == wanted),
        }
    }
}

/// Raw public key bytes tagged with their curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// 32-byte Ed25519 public key
    Ed25519(Vec<u8>),
    /// Uncompressed SEC1 P-256 point (65 bytes)
    P256(Vec<u8>),
    /// Uncompressed SEC1 secp256k1 point (65 bytes)
    Secp256k1(Vec<u8>),
}

impl DidDocument {
    /// Looks up a verification method by key id.
    ///
    /// Accepts either an absolute DID URL (`did:...#frag`) or a bare fragment
    /// (`#frag`). An absolute key id naming a different DID never matches.
    pub fn find_verification_method(&self, kid: &str) -> Option<&VerificationMethod> {
        let fragment = match kid.split_once('#') {
            Some((did, frag)) => {
                if !did.is_empty() && did != self.id {
                    return None;
                }
                frag
            }
            None => return self.verification_method.iter().find(|m| m.id == kid),
        };

        self.verification_method.iter().find(|m| {
            m.id == kid
                || m
                    .id
                    .split_once('#')
                    .map(|(did, frag)| frag == fragment && (did.is_empty() || did == self.id))
                    .unwrap_or(false)
        })
    }

    /// Services whose type includes `LinkedDomains`.
    pub fn linked_domain_services(&self) -> impl Iterator<Item = &Service> {
        self.service
            .iter()
            .filter(|s| s.type_.contains(LINKED_DOMAINS_SERVICE_TYPE))
    }
}

impl VerificationMethod {
    /// Decodes the method's JWK into key material.
    ///
    /// # Errors
    /// Returns `VerificationError::InvalidKey` if the method carries no JWK,
    /// the curve is unsupported, or a coordinate is not valid base64url.
    pub fn key_material(&self) -> Result<KeyMaterial, VerificationError> {
        let jwk = self.public_key_jwk.as_ref().ok_or_else(|| {
            VerificationError::InvalidKey(format!("{} has no publicKeyJwk", self.id))
        })?;
        KeyMaterial::try_from(jwk)
    }
}

impl TryFrom<&PublicKeyJwk> for KeyMaterial {
    type Error = VerificationError;

    fn try_from(jwk: &PublicKeyJwk) -> Result<Self, Self::Error> {
        let coordinate = |c: &Option<String>, name: &str| -> Result<Vec<u8>, VerificationError> {
            let value = c.as_deref().ok_or_else(|| {
                VerificationError::InvalidKey(format!("missing JWK member {}", name))
            })?;
            decode_base64url(value)
                .map_err(|e| VerificationError::InvalidKey(format!("JWK member {}: {}", name, e)))
        };

        match (jwk.kty.as_str(), jwk.crv.as_deref()) {
            ("OKP", Some("Ed25519")) => Ok(KeyMaterial::Ed25519(coordinate(&jwk.x, "x")?)),
            ("EC", Some(crv @ ("P-256" | "secp256k1"))) => {
                let mut point = vec![0x04];
                point.extend(coordinate(&jwk.x, "x")?);
                point.extend(coordinate(&jwk.y, "y")?);
                Ok(if crv == "P-256" {
                    KeyMaterial::P256(point)
                } else {
                    KeyMaterial::Secp256k1(point)
                })
            }
            (kty, crv) => Err(VerificationError::InvalidKey(format!(
                "unsupported JWK kty={} crv={}",
                kty,
                crv.unwrap_or("none")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> DidDocument {
        serde_json::from_value(json!({
            "id": "did:iota:testnet:0xabc",
            "verificationMethod": [{
                "id": "did:iota:testnet:0xabc#key-1",
                "type": "JsonWebKey2020",
                "controller": "did:iota:testnet:0xabc",
                "publicKeyJwk": { "kty": "OKP", "crv": "Ed25519", "x": "AAAA" }
            }],
            "service": [
                {
                    "id": "#web",
                    "type": ["LinkedDomains"],
                    "serviceEndpoint": "https://foo.example.com"
                },
                {
                    "id": "#other",
                    "type": "Messaging",
                    "serviceEndpoint": "https://msg.example.com"
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_find_method_by_absolute_and_fragment() {
        let doc = document();
        assert!(doc.find_verification_method("did:iota:testnet:0xabc#key-1").is_some());
        assert!(doc.find_verification_method("#key-1").is_some());
        assert!(doc.find_verification_method("#key-2").is_none());
    }

    #[test]
    fn test_find_method_rejects_foreign_did() {
        let doc = document();
        assert!(doc.find_verification_method("did:iota:testnet:0xdef#key-1").is_none());
    }

    #[test]
    fn test_linked_domain_services_filter() {
        let doc = document();
        let ids: Vec<_> = doc.linked_domain_services().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["#web"]);
    }

    #[test]
    fn test_key_material_from_jwk() {
        let ed = PublicKeyJwk {
            kty: "OKP".into(),
            crv: Some("Ed25519".into()),
            x: Some("AAAA".into()),
            y: None,
        };
        assert_eq!(KeyMaterial::try_from(&ed).unwrap(), KeyMaterial::Ed25519(vec![0, 0, 0]));

        let ec = PublicKeyJwk {
            kty: "EC".into(),
            crv: Some("secp256k1".into()),
            x: Some("AQ".into()),
            y: Some("Ag".into()),
        };
        assert_eq!(KeyMaterial::try_from(&ec).unwrap(), KeyMaterial::Secp256k1(vec![4, 1, 2]));

        let rsa = PublicKeyJwk { kty: "RSA".into(), crv: None, x: None, y: None };
        assert!(KeyMaterial::try_from(&rsa).is_err());
    }
}
