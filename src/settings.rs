// src/settings.rs
//! Runtime configuration for the HTTP collaborators.
//!
//! Values are layered with the `config` crate:
//! 1. built-in defaults
//! 2. an optional `linkage.{toml,json,yaml}` file in the working directory
//! 3. `LINKAGE_*` environment variables (e.g. `LINKAGE_RESOLVER_URL`)
//!
//! Settings are handed to the adapters at construction time; nothing reads
//! the environment afterwards.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Default DID resolver endpoint (a Universal Resolver instance).
pub const DEFAULT_RESOLVER_URL: &str = "https://dev.uniresolver.io/1.0/identifiers";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the DID resolver; the DID is appended as a path segment
    pub resolver_url: String,

    /// Timeout applied to every HTTP request, in seconds
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Settings {
    /// Loads settings from defaults, `linkage.*` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(Some("linkage"), Environment::with_prefix("LINKAGE"))
    }

    fn from_sources(file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("resolver_url", DEFAULT_RESOLVER_URL)?
            .set_default("request_timeout_secs", 10)?;
        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }
        builder.add_source(env).build()?.try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the shared HTTP client for both adapters.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().timeout(self.request_timeout());
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}
