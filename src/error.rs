// src/error.rs
//! Error types for domain linkage verification.
//!
//! Every failure of a verification attempt is reported as one distinct
//! [`LinkageError`] kind. Collaborator errors ([`ResolutionError`],
//! [`FetchError`], [`VerificationError`]) are wrapped into it before they
//! reach the caller.

use chrono::{DateTime, Utc};

/// Terminal outcome of a failed verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkageError {
    #[error("DID resolution failed for {did}: {reason}")]
    ResolutionFailed { did: String, reason: String },

    #[error("Failed to fetch DID configuration from {domain}: {reason}")]
    FetchFailed { domain: String, reason: String },

    #[error("Malformed DID configuration: {0}")]
    MalformedConfiguration(String),

    #[error("DID {0} declares no LinkedDomains service")]
    NoLinkedDomainService(String),

    #[error("Invalid LinkedDomains service: {0}")]
    InvalidLinkedDomainService(String),

    #[error("Domain {domain} is not declared by {did}")]
    DomainNotDeclared { did: String, domain: String },

    #[error("Invalid credential token: {0}")]
    InvalidTokenEncoding(String),

    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(String),

    #[error("Issuer mismatch: expected {expected}, found {found}")]
    IssuerMismatch { expected: String, found: String },

    #[error("Domain mismatch: expected {expected}, found {found}")]
    DomainMismatch { expected: String, found: String },

    #[error("Credential expired at {expired_at}")]
    CredentialExpired { expired_at: DateTime<Utc> },

    #[error("Credential not valid before {valid_from}")]
    CredentialNotYetValid { valid_from: DateTime<Utc> },

    #[error("Credential type does not include DomainLinkageCredential: {0:?}")]
    WrongCredentialType(Vec<String>),
}

/// Failure reported by a [`crate::clients::DidResolver`].
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("DID not found: {0}")]
    NotFound(String),

    #[error("Invalid DID: {0}")]
    InvalidDid(String),

    #[error("Invalid resolver endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Invalid DID document: {0}")]
    InvalidDocument(String),
}

/// Failure reported by a [`crate::clients::ConfigurationFetcher`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Response is not JSON: {0}")]
    InvalidBody(String),

    #[error("No configuration for {0}")]
    NotFound(String),
}

/// Failure reported by a [`crate::utils::crypto::SignatureVerifier`].
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, LinkageError>;

impl LinkageError {
    pub(crate) fn resolution(did: &str, err: ResolutionError) -> Self {
        LinkageError::ResolutionFailed {
            did: did.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn fetch(domain: &str, err: FetchError) -> Self {
        LinkageError::FetchFailed {
            domain: domain.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<VerificationError> for LinkageError {
    fn from(err: VerificationError) -> Self {
        LinkageError::SignatureVerificationFailed(err.to_string())
    }
}
