// src/utils/serialization.rs
//! Serialization utilities for compact signed tokens.
//!
//! Provides:
//! - base64url (unpadded) encoding and decoding
//! - JSON decoding of base64url token segments

use serde::de::DeserializeOwned;

/// Decodes an unpadded (or padded) base64url string.
///
/// # Arguments
/// * `data` - base64url text
///
/// # Returns
/// - `Ok(Vec<u8>)` with the decoded bytes
/// - `Err(base64::DecodeError)` on invalid characters or length
pub fn decode_base64url(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::decode_config(data, base64::URL_SAFE_NO_PAD)
}

/// Encodes bytes as unpadded base64url.
pub fn encode_base64url(data: &[u8]) -> String {
    base64::encode_config(data, base64::URL_SAFE_NO_PAD)
}

/// Decodes a base64url segment holding a JSON object.
///
/// # Errors
/// Returns a description of the failing step (base64, UTF-8 or JSON).
pub fn decode_json_segment<T: DeserializeOwned>(segment: &str) -> Result<T, String> {
    let bytes = decode_base64url(segment).map_err(|e| format!("Base64 decoding failed: {}", e))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("JSON decoding failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_json_segment() {
        let segment = encode_base64url(br#"{"alg":"EdDSA"}"#);
        let value: Value = decode_json_segment(&segment).unwrap();
        assert_eq!(value["alg"], "EdDSA");
    }

    #[test]
    fn test_json_segment_errors() {
        assert!(decode_json_segment::<Value>("!!!").unwrap_err().starts_with("Base64"));
        let not_json = encode_base64url(b"not json");
        assert!(decode_json_segment::<Value>(&not_json).unwrap_err().starts_with("JSON"));
    }
}
