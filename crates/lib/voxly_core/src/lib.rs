//! # voxly_core
//!
//! Core authentication and session logic for Voxly.

pub mod auth;
pub mod config;
pub mod error;
pub mod migrate;
pub mod models;
pub mod session;
pub mod users;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
