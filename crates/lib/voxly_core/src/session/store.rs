//! Key-value backend abstraction for the session store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AuthResult;

/// A string key-value store with per-key expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Write `value` under `key`, expiring after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AuthResult<()>;

    /// Read `key`. Missing or expired keys are `Ok(None)`.
    async fn get(&self, key: &str) -> AuthResult<Option<String>>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> AuthResult<()>;
}

/// Establishes the store connection. Called at most once per `SessionManager`.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> AuthResult<Arc<dyn KeyValueStore>>;
}
