// src/models/configuration.rs
//! Domain Linkage Configuration resource.
//!
//! The JSON document a domain hosts at `/.well-known/did-configuration.json`:
//!
//! ```json
//! {
//!   "@context": "https://identity.foundation/.well-known/did-configuration/v1",
//!   "linked_dids": ["<compact token>", "..."]
//! }
//! ```
//!
//! Fetched fresh on every verification and never cached.

use crate::error::LinkageError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Required value of the resource's `@context` member.
pub const DID_CONFIGURATION_CONTEXT: &str =
    "https://identity.foundation/.well-known/did-configuration/v1";

/// Path of the resource relative to a domain origin.
pub const DID_CONFIGURATION_PATH: &str = "/.well-known/did-configuration.json";

/// A fetched configuration resource.
///
/// Both members are kept as loose JSON so that a resource with missing or
/// mistyped fields still deserializes; [`DomainLinkageConfiguration::credential_tokens`]
/// performs the shape check.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DomainLinkageConfiguration {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_dids: Option<Value>,
}

impl DomainLinkageConfiguration {
    /// Builds a resource from any JSON value. Non-object values yield an empty
    /// resource, which then fails the shape check.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Checks the resource shape and returns the raw credential tokens in order.
    ///
    /// # Errors
    /// `MalformedConfiguration` if:
    /// - `@context` is missing or differs from [`DID_CONFIGURATION_CONTEXT`]
    /// - `linked_dids` is missing, empty, or contains a non-string entry
    pub fn credential_tokens(&self) -> Result<Vec<&str>, LinkageError> {
        match self.context.as_ref() {
            Some(Value::String(ctx)) if ctx == DID_CONFIGURATION_CONTEXT => {}
            Some(other) => {
                return Err(LinkageError::MalformedConfiguration(format!(
                    "unexpected @context {}",
                    other
                )))
            }
            None => {
                return Err(LinkageError::MalformedConfiguration(
                    "missing @context".to_string(),
                ))
            }
        }

        let entries = match self.linked_dids.as_ref() {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(LinkageError::MalformedConfiguration(
                    "linked_dids is not an array".to_string(),
                ))
            }
            None => {
                return Err(LinkageError::MalformedConfiguration(
                    "missing linked_dids".to_string(),
                ))
            }
        };
        if entries.is_empty() {
            return Err(LinkageError::MalformedConfiguration(
                "linked_dids is empty".to_string(),
            ));
        }

        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry.as_str().ok_or_else(|| {
                    LinkageError::MalformedConfiguration(format!(
                        "linked_dids[{}] is not a compact token",
                        i
                    ))
                })
            })
            .collect()
    }
}
