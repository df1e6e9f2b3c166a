// src/clients/configuration_fetcher.rs
//! Domain Linkage Configuration fetch adapters.
//!
//! [`HttpConfigurationFetcher`] performs
//! `GET https://<domain>/.well-known/did-configuration.json` with
//! `Accept: application/json`. Only `https` domains are fetched. A non-2xx
//! status or a body that is not JSON is a [`FetchError`]; a JSON body of the
//! wrong shape is returned as-is and rejected later by the validator.

use crate::error::FetchError;
use crate::models::configuration::{DomainLinkageConfiguration, DID_CONFIGURATION_PATH};
use crate::utils::origin::normalize_https_origin;
use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client, Url};
use serde_json::Value;
use std::collections::HashMap;

/// Fetches the configuration resource of a domain.
#[async_trait]
pub trait ConfigurationFetcher: Send + Sync {
    async fn fetch(&self, domain: &str) -> Result<DomainLinkageConfiguration, FetchError>;
}

/// Fetches configuration resources over HTTP. Never caches.
#[derive(Clone, Debug)]
pub struct HttpConfigurationFetcher {
    client: Client,
    // Serves every domain from this base instead of the domain itself.
    base_url: Option<Url>,
}

impl HttpConfigurationFetcher {
    pub fn new(client: Client) -> Self {
        HttpConfigurationFetcher {
            client,
            base_url: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(client: Client, base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidDomain(format!("{}: {}", base_url, e)))?;
        Ok(HttpConfigurationFetcher {
            client,
            base_url: Some(base_url),
        })
    }

    /// Well-known URL of a domain's configuration resource.
    ///
    /// # Errors
    /// `InvalidDomain` unless `domain` is an absolute `https` URI.
    pub fn configuration_url(domain: &str) -> Result<Url, FetchError> {
        let origin = normalize_https_origin(domain).map_err(FetchError::InvalidDomain)?;
        Url::parse(&format!("{}{}", origin, DID_CONFIGURATION_PATH))
            .map_err(|e| FetchError::InvalidDomain(format!("{}: {}", domain, e)))
    }

    fn resource_url(&self, domain: &str) -> Result<Url, FetchError> {
        let url = Self::configuration_url(domain)?;
        match &self.base_url {
            Some(base) => base
                .join(url.path())
                .map_err(|e| FetchError::InvalidDomain(format!("{}: {}", base, e))),
            None => Ok(url),
        }
    }
}

#[async_trait]
impl ConfigurationFetcher for HttpConfigurationFetcher {
    async fn fetch(&self, domain: &str) -> Result<DomainLinkageConfiguration, FetchError> {
        let url = self.resource_url(domain)?;
        debug!("Fetching DID configuration from {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }

        let body = response.bytes().await?;
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| FetchError::InvalidBody(e.to_string()))?;
        Ok(DomainLinkageConfiguration::from_value(value))
    }
}

/// Fetcher backed by a fixed set of resources, keyed by normalized origin.
#[derive(Clone, Debug, Default)]
pub struct InMemoryConfigurationFetcher {
    resources: HashMap<String, DomainLinkageConfiguration>,
}

impl InMemoryConfigurationFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        domain: &str,
        resource: DomainLinkageConfiguration,
    ) -> Result<(), FetchError> {
        let origin = normalize_https_origin(domain).map_err(FetchError::InvalidDomain)?;
        self.resources.insert(origin, resource);
        Ok(())
    }

    pub fn with_resource(
        mut self,
        domain: &str,
        resource: DomainLinkageConfiguration,
    ) -> Result<Self, FetchError> {
        self.insert(domain, resource)?;
        Ok(self)
    }
}

#[async_trait]
impl ConfigurationFetcher for InMemoryConfigurationFetcher {
    async fn fetch(&self, domain: &str) -> Result<DomainLinkageConfiguration, FetchError> {
        let origin = normalize_https_origin(domain).map_err(FetchError::InvalidDomain)?;
        self.resources
            .get(&origin)
            .cloned()
            .ok_or(FetchError::NotFound(origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::configuration::DID_CONFIGURATION_CONTEXT;
    use mockito::mock;
    use serde_json::json;

    const DOMAIN: &str = "https://foo.example.com";

    #[test]
    fn test_configuration_url() {
        assert_eq!(
            HttpConfigurationFetcher::configuration_url("https://foo.example.com/")
                .unwrap()
                .as_str(),
            "https://foo.example.com/.well-known/did-configuration.json"
        );
        assert!(matches!(
            HttpConfigurationFetcher::configuration_url("foo.example.com"),
            Err(FetchError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_plain_http_domain_is_rejected() {
        assert!(matches!(
            HttpConfigurationFetcher::configuration_url("http://foo.example.com"),
            Err(FetchError::InvalidDomain(_))
        ));

        let fetcher = mock_fetcher();
        assert!(matches!(
            tokio_test::block_on(fetcher.fetch("http://foo.example.com")),
            Err(FetchError::InvalidDomain(_))
        ));
        assert!(matches!(
            tokio_test::block_on(
                InMemoryConfigurationFetcher::new().fetch("http://foo.example.com")
            ),
            Err(FetchError::InvalidDomain(_))
        ));
    }

    fn mock_fetcher() -> HttpConfigurationFetcher {
        HttpConfigurationFetcher::with_base_url(Client::new(), &mockito::server_url()).unwrap()
    }

    // All mocks share one server; mockito serializes the tests that create them.
    #[tokio::test]
    async fn test_fetch_ok() {
        let body = json!({
            "@context": DID_CONFIGURATION_CONTEXT,
            "linked_dids": ["a.b.c"]
        });
        let m = mock("GET", DID_CONFIGURATION_PATH)
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create();

        let config = mock_fetcher().fetch(DOMAIN).await.unwrap();
        assert_eq!(config.credential_tokens().unwrap(), vec!["a.b.c"]);
        m.assert();
    }

    #[tokio::test]
    async fn test_fetch_errors() {
        let fetcher = mock_fetcher();

        let not_json = mock("GET", DID_CONFIGURATION_PATH)
            .with_status(200)
            .with_body("<html>nope</html>")
            .create();
        assert!(matches!(
            fetcher.fetch(DOMAIN).await,
            Err(FetchError::InvalidBody(_))
        ));
        drop(not_json);

        let _gone = mock("GET", DID_CONFIGURATION_PATH).with_status(404).create();
        assert!(matches!(
            fetcher.fetch(DOMAIN).await,
            Err(FetchError::HttpStatus(s)) if s.as_u16() == 404
        ));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_returned_for_validation() {
        let _m = mock("GET", DID_CONFIGURATION_PATH)
            .with_status(200)
            .with_body(r#"{"@context":"wrong-context","linked_dids":[]}"#)
            .create();
        let config = mock_fetcher().fetch(DOMAIN).await.unwrap();
        assert_eq!(config.context, Some(json!("wrong-context")));
    }

    #[test]
    fn test_in_memory_fetcher() {
        let resource = DomainLinkageConfiguration::from_value(json!({
            "@context": DID_CONFIGURATION_CONTEXT,
            "linked_dids": ["x.y.z"]
        }));
        let fetcher = InMemoryConfigurationFetcher::new()
            .with_resource("https://foo.example.com/", resource.clone())
            .unwrap();
        assert_eq!(
            tokio_test::block_on(fetcher.fetch("https://foo.example.com")).unwrap(),
            resource
        );
        assert!(matches!(
            tokio_test::block_on(fetcher.fetch("https://bar.example.com")),
            Err(FetchError::NotFound(_))
        ));
    }
}
