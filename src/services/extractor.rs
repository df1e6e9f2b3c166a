// src/services/extractor.rs
//! Linked-Domain Service extraction.
//!
//! Scans a DID Document for `LinkedDomains` services and parses their
//! endpoints into normalized HTTPS origins.

use crate::error::LinkageError;
use crate::models::did::{DidDocument, Service};
use crate::models::linkage::LinkedDomainService;
use crate::utils::origin::normalize_https_origin;
use serde_json::Value;

/// Extracts every `LinkedDomains` service of a DID Document.
///
/// # Arguments
/// * `document` - Resolved DID Document (read-only)
///
/// # Returns
/// - `Ok(vec![])` when the document declares no linked domains; this is a
///   normal outcome, not an error
/// - `Ok(services)` in document order
///
/// # Errors
/// `InvalidLinkedDomainService` if a matching service's endpoint is not a
/// string or a non-empty array of strings, or an entry is not an absolute
/// HTTPS URI.
pub fn extract_linked_domains(
    document: &DidDocument,
) -> Result<Vec<LinkedDomainService>, LinkageError> {
    document
        .linked_domain_services()
        .map(|service| {
            endpoint_domains(service).map(|domains| LinkedDomainService {
                did: document.id.clone(),
                service_id: service.id.clone(),
                domains,
            })
        })
        .collect()
}

fn endpoint_domains(service: &Service) -> Result<Vec<String>, LinkageError> {
    let invalid = |reason: String| {
        LinkageError::InvalidLinkedDomainService(format!("{}: {}", service.id, reason))
    };

    let raw: Vec<&str> = match &service.service_endpoint {
        Value::String(uri) => vec![uri.as_str()],
        Value::Array(items) if items.is_empty() => {
            return Err(invalid("endpoint array is empty".to_string()))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| invalid(format!("endpoint entry {} is not a string", item)))
            })
            .collect::<Result<Vec<&str>, _>>()?,
        other => return Err(invalid(format!("unsupported endpoint {}", other))),
    };

    raw.into_iter()
        .map(|uri| normalize_https_origin(uri).map_err(invalid))
        .collect()
}
