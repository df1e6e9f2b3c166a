// src/utils/test_support.rs
//! Fixture builders shared by the unit tests: deterministic signers, DID
//! Documents with a `LinkedDomains` service and signed linkage credentials.

use crate::models::configuration::{DomainLinkageConfiguration, DID_CONFIGURATION_CONTEXT};
use crate::models::did::{DidDocument, KeyMaterial};
use crate::utils::serialization::encode_base64url;
use chrono::{DateTime, TimeZone, Utc};
use k256::ecdsa::signature::Signer;
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, Ed25519KeyPair, KeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};
use serde_json::{json, Value};

pub const DID: &str = "did:iota:testnet:0x7a3f";
pub const DOMAIN: &str = "https://foo.example.com";

/// Fixed verification time used by the tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub trait FixtureSigner {
    fn alg(&self) -> &'static str;
    fn sign(&self, message: &[u8]) -> Vec<u8>;
    fn jwk(&self) -> Value;
}

pub struct Ed25519Signer(Ed25519KeyPair);

impl Ed25519Signer {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Ed25519Signer(Ed25519KeyPair::from_seed_unchecked(&seed).unwrap())
    }

    pub fn key_material(&self) -> KeyMaterial {
        KeyMaterial::Ed25519(self.0.public_key().as_ref().to_vec())
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.0.sign(message).as_ref().to_vec()
    }
}

impl FixtureSigner for Ed25519Signer {
    fn alg(&self) -> &'static str {
        "EdDSA"
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        Ed25519Signer::sign(self, message)
    }

    fn jwk(&self) -> Value {
        json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": encode_base64url(self.0.public_key().as_ref()),
        })
    }
}

pub struct Secp256k1Signer(k256::ecdsa::SigningKey);

impl Secp256k1Signer {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Secp256k1Signer(k256::ecdsa::SigningKey::from_slice(&seed).unwrap())
    }

    pub fn key_material(&self) -> KeyMaterial {
        let point = self.0.verifying_key().to_encoded_point(false);
        KeyMaterial::Secp256k1(point.as_bytes().to_vec())
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: k256::ecdsa::Signature = self.0.sign(message);
        signature.to_bytes().to_vec()
    }
}

impl FixtureSigner for Secp256k1Signer {
    fn alg(&self) -> &'static str {
        "ES256K"
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        Secp256k1Signer::sign(self, message)
    }

    fn jwk(&self) -> Value {
        let point = self.0.verifying_key().to_encoded_point(false);
        json!({
            "kty": "EC",
            "crv": "secp256k1",
            "x": encode_base64url(point.x().unwrap()),
            "y": encode_base64url(point.y().unwrap()),
        })
    }
}

/// P-256 signer producing fixed-width `r || s` signatures. Not deterministic.
pub struct P256Signer {
    key_pair: EcdsaKeyPair,
    rng: SystemRandom,
}

impl P256Signer {
    pub fn generate() -> Self {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng).unwrap();
        let key_pair =
            EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8.as_ref()).unwrap();
        P256Signer { key_pair, rng }
    }

    pub fn key_material(&self) -> KeyMaterial {
        KeyMaterial::P256(self.key_pair.public_key().as_ref().to_vec())
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.key_pair.sign(&self.rng, message).unwrap().as_ref().to_vec()
    }
}

impl FixtureSigner for P256Signer {
    fn alg(&self) -> &'static str {
        "ES256"
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        P256Signer::sign(self, message)
    }

    fn jwk(&self) -> Value {
        let point = self.key_pair.public_key().as_ref();
        json!({
            "kty": "EC",
            "crv": "P-256",
            "x": encode_base64url(&point[1..33]),
            "y": encode_base64url(&point[33..65]),
        })
    }
}

/// DID Document with one JWK method (`#key-1`) and a `LinkedDomains` service.
pub fn did_document(did: &str, signer: &dyn FixtureSigner, domains: Value) -> DidDocument {
    serde_json::from_value(json!({
        "id": did,
        "verificationMethod": [{
            "id": format!("{}#key-1", did),
            "type": "JsonWebKey2020",
            "controller": did,
            "publicKeyJwk": signer.jwk(),
        }],
        "service": [{
            "id": format!("{}#domains", did),
            "type": "LinkedDomains",
            "serviceEndpoint": domains,
        }]
    }))
    .unwrap()
}

/// Standard domain linkage claims: issued 2025-01-01, expires 2026-01-01.
pub fn claims(issuer: &str, origin: &str) -> Value {
    json!({
        "iss": issuer,
        "sub": issuer,
        "nbf": 1_735_689_600i64,
        "exp": 1_767_225_600i64,
        "vc": {
            "@context": [
                "https://www.w3.org/2018/credentials/v1",
                "https://identity.foundation/.well-known/did-configuration/v1"
            ],
            "issuer": issuer,
            "issuanceDate": "2025-01-01T00:00:00Z",
            "expirationDate": "2026-01-01T00:00:00Z",
            "type": ["VerifiableCredential", "DomainLinkageCredential"],
            "credentialSubject": { "id": issuer, "origin": origin }
        }
    })
}

/// Signs `claims` as a compact token with `kid = <issuer>#key-1`.
pub fn sign_token(signer: &dyn FixtureSigner, kid: Option<&str>, claims: &Value) -> String {
    let mut header = json!({ "alg": signer.alg(), "typ": "JWT" });
    if let Some(kid) = kid {
        header["kid"] = json!(kid);
    }
    let signing_input = format!(
        "{}.{}",
        encode_base64url(header.to_string().as_bytes()),
        encode_base64url(claims.to_string().as_bytes())
    );
    let signature = signer.sign(signing_input.as_bytes());
    format!("{}.{}", signing_input, encode_base64url(&signature))
}

pub fn configuration(tokens: Vec<String>) -> DomainLinkageConfiguration {
    DomainLinkageConfiguration::from_value(json!({
        "@context": DID_CONFIGURATION_CONTEXT,
        "linked_dids": tokens,
    }))
}
