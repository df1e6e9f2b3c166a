// src/lib.rs

//! # DID Domain Linkage Verifier
//!
//! Establishes and validates the cryptographic linkage between a Decentralized
//! Identifier and a web domain (DIF Well-Known DID Configuration).
//!
//! ## Architecture Overview
//! 1. **Clients**: DID resolution and well-known configuration fetch adapters
//! 2. **Models**: DID Documents, configuration resources, linkage credentials
//! 3. **Services**: linked-domain extraction, the validation pipeline and the
//!    directional / bidirectional verifier
//! 4. **Utils**: signature verification capability, origin normalization,
//!    token segment decoding
//!
//! ## Example
//! ```no_run
//! use did_domain_linkage::{
//!     DomainLinkageVerifier, HttpConfigurationFetcher, HttpDidResolver, JwsSignatureVerifier,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let http = reqwest::Client::new();
//! let verifier = DomainLinkageVerifier::new(
//!     Arc::new(HttpDidResolver::new(
//!         http.clone(),
//!         "https://resolver.example.com/1.0/identifiers",
//!     )?),
//!     Arc::new(HttpConfigurationFetcher::new(http)),
//!     Arc::new(JwsSignatureVerifier::new()),
//! );
//! let report = verifier
//!     .verify_bidirectional("did:iota:testnet:0x7a3f", "https://foo.example.com")
//!     .await;
//! assert!(report.is_linked());
//! # Ok(())
//! # }
//! ```

pub mod clients;
pub mod error;
pub mod models;
pub mod services;
pub mod settings;
pub mod utils;

pub use clients::configuration_fetcher::{
    ConfigurationFetcher, HttpConfigurationFetcher, InMemoryConfigurationFetcher,
};
pub use clients::did_resolver::{DidResolver, HttpDidResolver, InMemoryDidResolver};
pub use error::{FetchError, LinkageError, ResolutionError, VerificationError};
pub use models::configuration::{DomainLinkageConfiguration, DID_CONFIGURATION_CONTEXT};
pub use models::credential::DomainLinkageCredential;
pub use models::did::{DidDocument, KeyMaterial};
pub use models::linkage::{BidirectionalReport, LinkedDomainService, VerifiedLinkage};
pub use services::extractor::extract_linked_domains;
pub use services::validator::{LinkageValidator, ValidationOptions};
pub use services::verifier::DomainLinkageVerifier;
pub use settings::Settings;
pub use utils::crypto::{JwsSignatureVerifier, SignatureVerifier};
