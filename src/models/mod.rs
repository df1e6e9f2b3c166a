// src/models/mod.rs
//! Data structures.

pub mod configuration;
pub mod credential;
pub mod did;
pub mod linkage;
