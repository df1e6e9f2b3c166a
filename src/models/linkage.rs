// src/models/linkage.rs
//! Linkage views and verification outcomes.

use crate::error::LinkageError;
use serde::{Deserialize, Serialize};

/// A `LinkedDomains` service entry of a DID Document.
///
/// Derived on every extraction, never persisted. `domains` keeps the
/// declaration order; the first entry is the primary domain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LinkedDomainService {
    /// DID owning the service
    pub did: String,
    pub service_id: String,
    /// Normalized origins in declaration order
    pub domains: Vec<String>,
}

impl LinkedDomainService {
    pub fn primary_domain(&self) -> Option<&str> {
        self.domains.first().map(String::as_str)
    }
}

/// A successfully verified DID ↔ domain linkage (one direction).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerifiedLinkage {
    pub issuer: String,
    pub domain: String,
}

/// Outcome of checking both directions for one DID and one domain.
///
/// Each direction is reported on its own, even when the other failed.
#[derive(Debug, Clone, PartialEq)]
pub struct BidirectionalReport {
    pub did: String,
    pub domain: String,
    pub did_to_domain: Result<VerifiedLinkage, LinkageError>,
    pub domain_to_did: Result<VerifiedLinkage, LinkageError>,
}

impl BidirectionalReport {
    /// `true` only when both directions succeeded and both proved the
    /// requested pair.
    pub fn is_linked(&self) -> bool {
        let proves_pair = |result: &Result<VerifiedLinkage, LinkageError>| {
            matches!(result, Ok(l) if l.issuer == self.did && l.domain == self.domain)
        };
        proves_pair(&self.did_to_domain) && proves_pair(&self.domain_to_did)
    }
}
