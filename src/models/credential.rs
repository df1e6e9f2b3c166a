// src/models/credential.rs
//! Domain Linkage Credential data model.
//!
//! A credential travels as a compact signed token (`header.payload.signature`,
//! each segment base64url). The payload follows the JWT profile of the DIF
//! Well-Known DID Configuration:
//!
//! ```json
//! {
//!   "iss": "did:...", "sub": "did:...", "nbf": 1735689600, "exp": 1767225600,
//!   "vc": {
//!     "type": ["VerifiableCredential", "DomainLinkageCredential"],
//!     "issuer": "did:...",
//!     "credentialSubject": { "id": "did:...", "origin": "https://example.com" }
//!   }
//! }
//! ```

use crate::error::LinkageError;
use crate::utils::serialization::{decode_base64url, decode_json_segment};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Credential type tag a linkage credential must carry.
pub const DOMAIN_LINKAGE_CREDENTIAL_TYPE: &str = "DomainLinkageCredential";

/// Protected header of a compact token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

/// A decoded (not yet verified) domain linkage credential.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainLinkageCredential {
    pub header: TokenHeader,

    /// `header.payload` exactly as transmitted, the input of the signature
    pub signing_input: String,

    pub signature: Vec<u8>,

    /// Issuer DID (`iss`, or `vc.issuer` when `iss` is absent)
    pub issuer: Option<String>,

    /// Credential subject DID (`vc.credentialSubject.id`, or `sub`)
    pub subject: Option<String>,

    /// Origin the credential binds the issuer to
    pub origin: Option<String>,

    pub issued_at: Option<DateTime<Utc>>,

    pub expires_at: Option<DateTime<Utc>>,

    /// Credential type tags (`vc.type`)
    pub types: Vec<String>,
}

impl DomainLinkageCredential {
    /// Decodes a compact token into header, claims and signature.
    ///
    /// Decoding does not check the signature or any claim value; it only
    /// rejects tokens that cannot be read.
    ///
    /// # Errors
    /// `InvalidTokenEncoding` if:
    /// - the token does not have exactly three non-empty segments
    /// - a segment is not valid base64url or the header/payload is not JSON
    /// - a claim has the wrong JSON type, or `iss` and `vc.issuer` disagree
    pub fn decode(token: &str) -> Result<Self, LinkageError> {
        let segments: Vec<&str> = token.trim().split('.').collect();
        let [header_b64, payload_b64, signature_b64] = segments.as_slice() else {
            return Err(LinkageError::InvalidTokenEncoding(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };
        if header_b64.is_empty() || payload_b64.is_empty() || signature_b64.is_empty() {
            return Err(LinkageError::InvalidTokenEncoding(
                "empty token segment".to_string(),
            ));
        }

        let header: TokenHeader = decode_json_segment(header_b64)
            .map_err(|e| LinkageError::InvalidTokenEncoding(format!("header: {}", e)))?;
        let payload: Value = decode_json_segment(payload_b64)
            .map_err(|e| LinkageError::InvalidTokenEncoding(format!("payload: {}", e)))?;
        let signature = decode_base64url(signature_b64)
            .map_err(|e| LinkageError::InvalidTokenEncoding(format!("signature: {}", e)))?;

        let claims = Claims::read(&payload)?;

        Ok(DomainLinkageCredential {
            header,
            signing_input: format!("{}.{}", header_b64, payload_b64),
            signature,
            issuer: claims.issuer,
            subject: claims.subject,
            origin: claims.origin,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
            types: claims.types,
        })
    }

    /// Returns `true` if the type tags include `DomainLinkageCredential`.
    pub fn has_linkage_type(&self) -> bool {
        self.types.iter().any(|t| t == DOMAIN_LINKAGE_CREDENTIAL_TYPE)
    }
}

/// Claim values pulled out of a token payload.
struct Claims {
    issuer: Option<String>,
    subject: Option<String>,
    origin: Option<String>,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    types: Vec<String>,
}

impl Claims {
    fn read(payload: &Value) -> Result<Self, LinkageError> {
        if !payload.is_object() {
            return Err(invalid("payload is not a JSON object"));
        }
        let vc = payload.get("vc").unwrap_or(&Value::Null);
        let subject = vc.get("credentialSubject").unwrap_or(&Value::Null);

        let iss = optional_str(payload, "iss")?;
        let vc_issuer = match vc.get("issuer") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(obj @ Value::Object(_)) => optional_str(obj, "id")?,
            Some(_) => return Err(invalid("vc.issuer must be a string or object")),
        };
        if let (Some(a), Some(b)) = (&iss, &vc_issuer) {
            if a != b {
                return Err(invalid(&format!("iss {} disagrees with vc.issuer {}", a, b)));
            }
        }

        let types = match vc.get("type") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(t)) => vec![t.clone()],
            Some(Value::Array(ts)) => ts
                .iter()
                .map(|t| {
                    t.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid("vc.type entries must be strings"))
                })
                .collect::<Result<Vec<String>, _>>()?,
            Some(_) => return Err(invalid("vc.type must be a string or array")),
        };

        Ok(Claims {
            issuer: iss.or(vc_issuer),
            subject: optional_str(subject, "id")?.or(optional_str(payload, "sub")?),
            origin: optional_str(subject, "origin")?,
            issued_at: timestamp(payload, "nbf", vc, "issuanceDate")?,
            expires_at: timestamp(payload, "exp", vc, "expirationDate")?,
            types,
        })
    }
}

fn invalid(reason: &str) -> LinkageError {
    LinkageError::InvalidTokenEncoding(reason.to_string())
}

fn optional_str(value: &Value, key: &str) -> Result<Option<String>, LinkageError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(&format!("{} must be a string", key))),
    }
}

/// Reads a NumericDate claim, falling back to an RFC 3339 date in the `vc` object.
fn timestamp(
    payload: &Value,
    numeric_key: &str,
    vc: &Value,
    date_key: &str,
) -> Result<Option<DateTime<Utc>>, LinkageError> {
    match payload.get(numeric_key) {
        None | Some(Value::Null) => {}
        Some(Value::Number(n)) => {
            let secs = n
                .as_i64()
                .ok_or_else(|| invalid(&format!("{} is not an integer", numeric_key)))?;
            return Utc
                .timestamp_opt(secs, 0)
                .single()
                .map(Some)
                .ok_or_else(|| invalid(&format!("{} is out of range", numeric_key)));
        }
        Some(_) => return Err(invalid(&format!("{} must be a number", numeric_key))),
    }

    optional_str(vc, date_key)?
        .map(|date| {
            DateTime::parse_from_rfc3339(&date)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| invalid(&format!("{}: {}", date_key, e)))
        })
        .transpose()
}
