// src/services/validator.rs
//! Linkage Validator: the core verification pipeline.
//!
//! Given a DID Document, a fetched configuration resource and the domain being
//! checked, decides whether the pair is cryptographically and semantically
//! linked. Stages run in a fixed order and the first failure is terminal:
//!
//! 1. resource shape (`MalformedConfiguration`)
//! 2. credential selection
//! 3. token decoding (`InvalidTokenEncoding`)
//! 4. signature (`SignatureVerificationFailed`)
//! 5. issuer, origin, expiry, not-before and type checks
//!
//! The validator is synchronous and holds no state; the result depends only on
//! its inputs and the verification time.

use crate::error::LinkageError;
use crate::models::configuration::DomainLinkageConfiguration;
use crate::models::credential::DomainLinkageCredential;
use crate::models::did::{DidDocument, VerificationMethod};
use crate::models::linkage::VerifiedLinkage;
use crate::utils::crypto::SignatureVerifier;
use crate::utils::origin::{normalize_https_origin, normalize_origin, same_origin};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

/// Tunables of a single validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Time the credential must be valid at; `None` means now
    pub verification_time: Option<DateTime<Utc>>,
    /// Reject credentials whose issuance time lies after the verification time
    pub check_not_before: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            verification_time: None,
            check_not_before: true,
        }
    }
}

impl ValidationOptions {
    /// Options pinned to a fixed verification time.
    pub fn at(time: DateTime<Utc>) -> Self {
        ValidationOptions {
            verification_time: Some(time),
            ..Self::default()
        }
    }
}

/// Runs the linkage pipeline for one DID Document and one domain.
pub struct LinkageValidator<'a> {
    signature_verifier: &'a dyn SignatureVerifier,
}

impl<'a> LinkageValidator<'a> {
    pub fn new(signature_verifier: &'a dyn SignatureVerifier) -> Self {
        LinkageValidator { signature_verifier }
    }

    /// Validates that `did_document` and `expected_domain` are linked by a
    /// credential of `configuration`.
    ///
    /// # Arguments
    /// * `did_document` - Document of the DID under test; its keys verify the credential
    /// * `configuration` - Resource fetched from `expected_domain`
    /// * `expected_domain` - Domain being checked (any URI of the origin)
    /// * `options` - Verification time and optional checks
    ///
    /// # Returns
    /// `VerifiedLinkage` carrying the document's DID and the normalized origin.
    pub fn validate_linkage(
        &self,
        did_document: &DidDocument,
        configuration: &DomainLinkageConfiguration,
        expected_domain: &str,
        options: &ValidationOptions,
    ) -> Result<VerifiedLinkage, LinkageError> {
        let tokens = configuration.credential_tokens()?;
        debug!(
            "Validating {} against {} ({} credentials)",
            did_document.id,
            expected_domain,
            tokens.len()
        );

        let token = select_credential(&tokens, &did_document.id, expected_domain);
        let credential = DomainLinkageCredential::decode(token)?;

        self.verify_signature(did_document, &credential)?;
        debug!("Signature of credential for {} verified", expected_domain);

        check_claims(&credential, &did_document.id, expected_domain, options)
            .map(|domain| {
                info!("Verified linkage {} <-> {}", did_document.id, domain);
                VerifiedLinkage {
                    issuer: did_document.id.clone(),
                    domain,
                }
            })
            .map_err(|e| {
                warn!("Rejected credential for {}: {}", expected_domain, e);
                e
            })
    }

    /// Verifies the token signature with the key named by `kid`, or with any
    /// JWK method of the document when the header carries no `kid`.
    fn verify_signature(
        &self,
        did_document: &DidDocument,
        credential: &DomainLinkageCredential,
    ) -> Result<(), LinkageError> {
        let candidates: Vec<&VerificationMethod> = match credential.header.kid.as_deref() {
            Some(kid) => vec![did_document.find_verification_method(kid).ok_or_else(|| {
                LinkageError::SignatureVerificationFailed(format!(
                    "key {} not found in {}",
                    kid, did_document.id
                ))
            })?],
            None => did_document
                .verification_method
                .iter()
                .filter(|m| m.public_key_jwk.is_some())
                .collect(),
        };
        if candidates.is_empty() {
            return Err(LinkageError::SignatureVerificationFailed(format!(
                "{} has no usable verification method",
                did_document.id
            )));
        }

        let single = candidates.len() == 1;
        for method in candidates {
            let outcome = method.key_material().and_then(|key| {
                self.signature_verifier.verify(
                    credential.signing_input.as_bytes(),
                    &credential.signature,
                    &key,
                    &credential.header.alg,
                )
            });
            match outcome {
                Ok(true) => return Ok(()),
                Ok(false) => debug!("Signature does not verify with {}", method.id),
                // With an explicit key a verifier error is the answer.
                Err(e) if single => return Err(e.into()),
                Err(e) => debug!("Skipping {}: {}", method.id, e),
            }
        }

        Err(LinkageError::SignatureVerificationFailed(format!(
            "signature does not verify against any key of {}",
            did_document.id
        )))
    }
}

/// Picks the credential to validate.
///
/// Preference: issuer and origin both match, then issuer matches, then the
/// first entry. Entries that cannot be decoded are only chosen as the
/// fallback, where decoding then reports them.
pub(crate) fn select_credential<'t>(
    tokens: &[&'t str],
    did: &str,
    expected_domain: &str,
) -> &'t str {
    let decoded: Vec<(&str, Option<DomainLinkageCredential>)> = tokens
        .iter()
        .map(|t| (*t, DomainLinkageCredential::decode(t).ok()))
        .collect();

    let issued_by_did = |c: &DomainLinkageCredential| c.issuer.as_deref() == Some(did);
    let for_domain = |c: &DomainLinkageCredential| {
        c.origin
            .as_deref()
            .map(|o| same_origin(o, expected_domain))
            .unwrap_or(false)
    };

    decoded
        .iter()
        .find(|(_, c)| c.as_ref().map(|c| issued_by_did(c) && for_domain(c)).unwrap_or(false))
        .or_else(|| {
            decoded
                .iter()
                .find(|(_, c)| c.as_ref().map(issued_by_did).unwrap_or(false))
        })
        .map(|(t, _)| *t)
        .unwrap_or(tokens[0])
}

/// Semantic checks on a decoded, signature-verified credential. Returns the
/// normalized origin on success.
fn check_claims(
    credential: &DomainLinkageCredential,
    did: &str,
    expected_domain: &str,
    options: &ValidationOptions,
) -> Result<String, LinkageError> {
    let issuer = credential.issuer.as_deref().unwrap_or_default();
    if issuer != did {
        return Err(LinkageError::IssuerMismatch {
            expected: did.to_string(),
            found: issuer.to_string(),
        });
    }
    if let Some(subject) = credential.subject.as_deref() {
        if subject != issuer {
            return Err(LinkageError::IssuerMismatch {
                expected: issuer.to_string(),
                found: subject.to_string(),
            });
        }
    }

    // Only https origins can be linked.
    let expected =
        normalize_https_origin(expected_domain).map_err(|_| LinkageError::DomainMismatch {
            expected: expected_domain.to_string(),
            found: credential.origin.clone().unwrap_or_default(),
        })?;
    let found = credential.origin.as_deref().unwrap_or_default();
    match normalize_origin(found) {
        Ok(origin) if origin == expected => {}
        _ => {
            return Err(LinkageError::DomainMismatch {
                expected,
                found: found.to_string(),
            })
        }
    }

    let now = options.verification_time.unwrap_or_else(Utc::now);
    if let Some(expired_at) = credential.expires_at {
        if expired_at <= now {
            return Err(LinkageError::CredentialExpired { expired_at });
        }
    }
    if options.check_not_before {
        if let Some(valid_from) = credential.issued_at {
            if valid_from > now {
                return Err(LinkageError::CredentialNotYetValid { valid_from });
            }
        }
    }

    if !credential.has_linkage_type() {
        return Err(LinkageError::WrongCredentialType(credential.types.clone()));
    }

    Ok(expected)
}
