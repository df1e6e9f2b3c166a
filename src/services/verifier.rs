// src/services/verifier.rs
//! Domain linkage verification service.
//!
//! Drives the collaborators (DID resolution, configuration fetch, signature
//! verification) and the [`LinkageValidator`] for the two directional entry
//! points:
//!
//! - **from DID**: resolve the DID → extract its linked domains → fetch the
//!   primary domain's configuration → validate
//! - **from domain**: fetch the domain's configuration → read the unverified
//!   issuer of its credential → resolve that issuer → validate
//!
//! A linkage is only established when both directions succeed; see
//! [`DomainLinkageVerifier::verify_bidirectional`].

use crate::clients::configuration_fetcher::ConfigurationFetcher;
use crate::clients::did_resolver::DidResolver;
use crate::error::LinkageError;
use crate::models::credential::DomainLinkageCredential;
use crate::models::did::DidDocument;
use crate::models::linkage::{BidirectionalReport, VerifiedLinkage};
use crate::services::extractor::extract_linked_domains;
use crate::services::validator::{select_credential, LinkageValidator, ValidationOptions};
use crate::utils::crypto::SignatureVerifier;
use crate::utils::origin::{normalize_origin, same_origin};
use log::{debug, info};
use std::sync::Arc;

/// Verifier for DID ↔ domain linkage.
///
/// Holds no mutable state: every call fetches fresh inputs and may run
/// concurrently with others.
#[derive(Clone)]
pub struct DomainLinkageVerifier {
    /// DID resolution collaborator
    resolver: Arc<dyn DidResolver>,
    /// Well-known configuration fetch collaborator
    fetcher: Arc<dyn ConfigurationFetcher>,
    /// Signature algorithm capability
    signature_verifier: Arc<dyn SignatureVerifier>,
    options: ValidationOptions,
}

impl DomainLinkageVerifier {
    /// Constructs a new verifier.
    ///
    /// # Arguments
    /// * `resolver` - Resolves DIDs into DID Documents
    /// * `fetcher` - Fetches configuration resources from domains
    /// * `signature_verifier` - Checks credential signatures
    pub fn new(
        resolver: Arc<dyn DidResolver>,
        fetcher: Arc<dyn ConfigurationFetcher>,
        signature_verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            signature_verifier,
            options: ValidationOptions::default(),
        }
    }

    /// Replaces the validation options (e.g. to pin the verification time).
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Verifies the linkage starting from a DID.
    ///
    /// Only the first domain of the first `LinkedDomains` service is checked.
    ///
    /// # Errors
    /// - `ResolutionFailed` if the DID cannot be resolved
    /// - `NoLinkedDomainService` if the document declares no linked domain
    /// - `FetchFailed` and every validator error for the primary domain
    pub async fn verify_from_did(&self, did: &str) -> Result<VerifiedLinkage, LinkageError> {
        let document = self.resolve(did).await?;
        let domain = primary_domain(&document)?;
        debug!("{} declares primary domain {}", did, domain);
        self.validate_domain(&document, &domain).await
    }

    /// Verifies the linkage from a DID to a specific declared domain.
    ///
    /// # Errors
    /// As [`verify_from_did`](Self::verify_from_did), plus `DomainNotDeclared`
    /// when `domain` is not listed by any `LinkedDomains` service of the DID.
    pub async fn verify_from_did_for_domain(
        &self,
        did: &str,
        domain: &str,
    ) -> Result<VerifiedLinkage, LinkageError> {
        let document = self.resolve(did).await?;
        let services = extract_linked_domains(&document)?;
        if services.is_empty() {
            return Err(LinkageError::NoLinkedDomainService(did.to_string()));
        }
        let declared = services
            .iter()
            .flat_map(|s| s.domains.iter())
            .find(|d| same_origin(d, domain))
            .cloned()
            .ok_or_else(|| LinkageError::DomainNotDeclared {
                did: did.to_string(),
                domain: domain.to_string(),
            })?;
        self.validate_domain(&document, &declared).await
    }

    /// Verifies the linkage starting from a domain.
    ///
    /// The issuer of the domain's credential is read before the signature is
    /// checked; it is only used to resolve the document whose keys then
    /// verify that same credential.
    ///
    /// # Errors
    /// - `FetchFailed` if the configuration cannot be retrieved
    /// - `MalformedConfiguration` / `InvalidTokenEncoding` if no issuer can be read
    /// - `ResolutionFailed` if the issuer cannot be resolved
    /// - every validator error
    pub async fn verify_from_domain(&self, domain: &str) -> Result<VerifiedLinkage, LinkageError> {
        let configuration = self
            .fetcher
            .fetch(domain)
            .await
            .map_err(|e| LinkageError::fetch(domain, e))?;

        let issuer = {
            let tokens = configuration.credential_tokens()?;
            let token = select_credential_for_domain(&tokens, domain);
            DomainLinkageCredential::decode(token)?
                .issuer
                .ok_or_else(|| {
                    LinkageError::InvalidTokenEncoding("credential has no issuer".to_string())
                })?
        };
        debug!("{} claims issuer {}", domain, issuer);

        let document = self.resolve(&issuer).await?;
        self.validator()
            .validate_linkage(&document, &configuration, domain, &self.options)
    }

    /// Runs both directions concurrently for one DID and one domain.
    ///
    /// The report carries each direction's own outcome;
    /// [`BidirectionalReport::is_linked`] is `true` only when both proved the
    /// requested pair.
    pub async fn verify_bidirectional(&self, did: &str, domain: &str) -> BidirectionalReport {
        let (did_to_domain, domain_to_did) =
            futures::join!(self.verify_from_did(did), self.verify_from_domain(domain));

        let report = BidirectionalReport {
            did: did.to_string(),
            domain: normalize_origin(domain).unwrap_or_else(|_| domain.to_string()),
            did_to_domain,
            domain_to_did,
        };
        info!(
            "Bidirectional linkage {} <-> {}: {}",
            report.did,
            report.domain,
            if report.is_linked() { "linked" } else { "not linked" }
        );
        report
    }

    fn validator(&self) -> LinkageValidator<'_> {
        LinkageValidator::new(self.signature_verifier.as_ref())
    }

    async fn resolve(&self, did: &str) -> Result<DidDocument, LinkageError> {
        self.resolver
            .resolve(did)
            .await
            .map_err(|e| LinkageError::resolution(did, e))
    }

    async fn validate_domain(
        &self,
        document: &DidDocument,
        domain: &str,
    ) -> Result<VerifiedLinkage, LinkageError> {
        let configuration = self
            .fetcher
            .fetch(domain)
            .await
            .map_err(|e| LinkageError::fetch(domain, e))?;
        self.validator()
            .validate_linkage(document, &configuration, domain, &self.options)
    }
}

/// Primary (first) domain of the first `LinkedDomains` service.
fn primary_domain(document: &DidDocument) -> Result<String, LinkageError> {
    extract_linked_domains(document)?
        .into_iter()
        .next()
        .and_then(|service| service.domains.into_iter().next())
        .ok_or_else(|| LinkageError::NoLinkedDomainService(document.id.clone()))
}

/// Picks the credential whose claimed origin is `domain`, before the issuer
/// is known.
fn select_credential_for_domain<'t>(tokens: &[&'t str], domain: &str) -> &'t str {
    tokens
        .iter()
        .copied()
        .find(|t| {
            DomainLinkageCredential::decode(t)
                .ok()
                .and_then(|c| c.origin)
                .map(|o| same_origin(&o, domain))
                .unwrap_or(false)
        })
        .map(|t| {
            // Among the credentials of that issuer, prefer the one for this domain.
            let issuer = DomainLinkageCredential::decode(t).ok().and_then(|c| c.issuer);
            issuer.map_or(t, |issuer| select_credential(tokens, &issuer, domain))
        })
        .unwrap_or(tokens[0])
}
