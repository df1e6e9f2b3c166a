// src/utils/mod.rs
//! Helper functions.

pub mod crypto;
pub mod origin;
pub mod serialization;

#[cfg(test)]
pub(crate) mod test_support;
