// src/services/mod.rs
//! Linkage extraction, validation and verification.

pub mod extractor;
pub mod validator;
pub mod verifier;
