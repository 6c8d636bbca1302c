//! API server configuration.

use voxly_core::config::{AuthConfig, RedisConfig};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:4175";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:4175").
    pub bind_addr: String,
    /// PostgreSQL connection URL for the user repository.
    pub database_url: String,
    /// Maximum number of pooled database connections.
    pub max_connections: u32,
    /// Token secret and token/session lifetimes.
    pub auth: AuthConfig,
    /// Session store connection target.
    pub redis: RedisConfig,
}

impl ApiConfig {
    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth.jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".into());
        }
        self.auth.validate()
    }
}
