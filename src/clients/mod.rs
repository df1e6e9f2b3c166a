// src/clients/mod.rs
//! Adapters for the external collaborators: DID resolution and configuration fetch.

pub mod configuration_fetcher;
pub mod did_resolver;
