// src/utils/crypto.rs
//! Signature verification capability.
//!
//! The validator never hard-codes a curve: it asks an injected
//! [`SignatureVerifier`] whether a signature is valid. [`JwsSignatureVerifier`]
//! is the default implementation and covers the JWS algorithms used by
//! domain linkage credentials:
//! - `EdDSA` (Ed25519) and `ES256` (P-256) via `jsonwebtoken`
//! - `ES256K` (secp256k1) via `k256`

use crate::error::VerificationError;
use crate::models::did::KeyMaterial;
use crate::utils::serialization::encode_base64url;
use jsonwebtoken::{Algorithm, DecodingKey};
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};
use std::str::FromStr;

/// Checks a signature over a signing input with a given public key.
///
/// Returns `Ok(false)` for a well-formed signature that does not verify, and
/// `Err` when the inputs cannot be checked at all.
pub trait SignatureVerifier: Send + Sync {
    fn verify(
        &self,
        signing_input: &[u8],
        signature: &[u8],
        public_key: &KeyMaterial,
        algorithm: &str,
    ) -> Result<bool, VerificationError>;
}

/// Default JWS verifier for `EdDSA`, `ES256` and `ES256K`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwsSignatureVerifier;

impl JwsSignatureVerifier {
    pub fn new() -> Self {
        JwsSignatureVerifier
    }

    /// secp256k1 ECDSA over SHA-256, 64-byte `r || s` signature.
    fn verify_es256k(
        signing_input: &[u8],
        signature: &[u8],
        point: &[u8],
    ) -> Result<bool, VerificationError> {
        let key = VerifyingKey::from_sec1_bytes(point)
            .map_err(|e| VerificationError::InvalidKey(e.to_string()))?;
        let signature = Signature::from_slice(signature)
            .map_err(|e| VerificationError::InvalidSignature(e.to_string()))?;
        Ok(key.verify(signing_input, &signature).is_ok())
    }
}

impl SignatureVerifier for JwsSignatureVerifier {
    fn verify(
        &self,
        signing_input: &[u8],
        signature: &[u8],
        public_key: &KeyMaterial,
        algorithm: &str,
    ) -> Result<bool, VerificationError> {
        if algorithm == "ES256K" {
            return match public_key {
                KeyMaterial::Secp256k1(point) => {
                    Self::verify_es256k(signing_input, signature, point)
                }
                _ => Err(VerificationError::InvalidKey(
                    "ES256K requires a secp256k1 key".to_string(),
                )),
            };
        }

        let alg = Algorithm::from_str(algorithm)
            .map_err(|_| VerificationError::UnsupportedAlgorithm(algorithm.to_string()))?;
        let key = match (alg, public_key) {
            (Algorithm::EdDSA, KeyMaterial::Ed25519(raw)) => DecodingKey::from_ed_der(raw),
            (Algorithm::ES256, KeyMaterial::P256(point)) => DecodingKey::from_ec_der(point),
            (Algorithm::EdDSA, _) | (Algorithm::ES256, _) => {
                return Err(VerificationError::InvalidKey(format!(
                    "key type does not match algorithm {}",
                    algorithm
                )))
            }
            _ => return Err(VerificationError::UnsupportedAlgorithm(algorithm.to_string())),
        };

        jsonwebtoken::crypto::verify(&encode_base64url(signature), signing_input, &key, alg)
            .map_err(|e| VerificationError::InvalidSignature(e.to_string()))
    }
}
