//! # chirpy_core
//!
//! Credential and session core for Chirpy: password hashing, access tokens,
//! header credential parsing and the refresh-token lifecycle.

pub mod auth;
pub mod migrate;
pub mod models;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
