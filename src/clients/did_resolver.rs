// src/clients/did_resolver.rs
//! DID Document resolution adapters.
//!
//! The verifier consumes resolution through the [`DidResolver`] trait. Two
//! implementations are provided:
//! - [`HttpDidResolver`]: queries a DID resolver HTTP endpoint
//!   (`GET <resolver_url>/<did>`), accepting either a bare DID Document or a
//!   DID Resolution Result carrying it under `didDocument`
//! - [`InMemoryDidResolver`]: serves documents from a fixed map

use crate::error::ResolutionError;
use crate::models::did::DidDocument;
use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client, StatusCode, Url};
use serde_json::Value;
use std::collections::HashMap;

/// Media type requested from DID resolvers.
pub const TYPE_DID_JSON: &str = "application/did+json";

/// Resolves a DID string into its DID Document.
#[async_trait]
pub trait DidResolver: Send + Sync {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolutionError>;
}

/// HTTP client for a DID resolver service.
///
/// Timeouts are configured on the supplied `reqwest::Client`; no retries are
/// attempted.
#[derive(Clone, Debug)]
pub struct HttpDidResolver {
    client: Client,
    endpoint: Url,
}

impl HttpDidResolver {
    /// Creates a resolver for the given endpoint.
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `resolver_url` - Base URL; the DID is appended as the last path segment
    ///
    /// # Errors
    /// Returns `ResolutionError::InvalidEndpoint` if `resolver_url` is not a
    /// valid base URL.
    pub fn new(client: Client, resolver_url: &str) -> Result<Self, ResolutionError> {
        let endpoint = Url::parse(resolver_url)
            .map_err(|e| ResolutionError::InvalidEndpoint(format!("{}: {}", resolver_url, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(ResolutionError::InvalidEndpoint(format!(
                "{} cannot be a base",
                resolver_url
            )));
        }
        Ok(HttpDidResolver { client, endpoint })
    }

    fn document_url(&self, did: &str) -> Result<Url, ResolutionError> {
        if !did.starts_with("did:") || did.split(':').count() < 3 {
            return Err(ResolutionError::InvalidDid(did.to_string()));
        }
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ResolutionError::InvalidDid(did.to_string()))?
            .pop_if_empty()
            .push(did);
        Ok(url)
    }
}

#[async_trait]
impl DidResolver for HttpDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolutionError> {
        let url = self.document_url(did)?;
        debug!("Resolving {} via {}", did, url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, TYPE_DID_JSON)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(ResolutionError::NotFound(did.to_string())),
            status => return Err(ResolutionError::HttpStatus(status)),
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ResolutionError::InvalidDocument(e.to_string()))?;
        parse_document(did, body)
    }
}

/// Unwraps a resolution result if needed and checks the document id.
fn parse_document(did: &str, mut body: Value) -> Result<DidDocument, ResolutionError> {
    let wrapped = body.get_mut("didDocument").map(Value::take);
    if let Some(document) = wrapped {
        body = document;
    }
    let document: DidDocument = serde_json::from_value(body)
        .map_err(|e| ResolutionError::InvalidDocument(e.to_string()))?;
    if document.id != did {
        return Err(ResolutionError::InvalidDocument(format!(
            "document id {} does not match {}",
            document.id, did
        )));
    }
    Ok(document)
}

/// Resolver backed by a fixed set of documents.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDidResolver {
    documents: HashMap<String, DidDocument>,
}

impl InMemoryDidResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a document, keyed by its id.
    pub fn insert(&mut self, document: DidDocument) {
        self.documents.insert(document.id.clone(), document);
    }

    pub fn with_document(mut self, document: DidDocument) -> Self {
        self.insert(document);
        self
    }
}

#[async_trait]
impl DidResolver for InMemoryDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolutionError> {
        self.documents
            .get(did)
            .cloned()
            .ok_or_else(|| ResolutionError::NotFound(did.to_string()))
    }
}
