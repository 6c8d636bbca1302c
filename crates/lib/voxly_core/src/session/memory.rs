//! In-process TTL store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::store::{KeyValueStore, StoreConnector};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Key-value store kept in a `DashMap`. Expired keys are evicted when read,
/// and every write sweeps out whatever else has expired, so the map never
/// holds more than the live keys plus those that lapsed since the last write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AuthResult<()> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| AuthError::Validation("ttl out of range".into()))?;
        self.entries.retain(|_, e| now < e.expires_at);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> AuthResult<Option<String>> {
        let now = Instant::now();
        let hit = self.entries.get(key).map(|e| e.clone());
        match hit {
            Some(entry) if now < entry.expires_at => Ok(Some(entry.value)),
            Some(_) => {
                self.entries.remove_if(key, |_, e| now >= e.expires_at);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> AuthResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Connector handing out one shared [`MemoryStore`].
#[derive(Debug, Default, Clone)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store this connector hands out.
    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    async fn connect(&self) -> AuthResult<Arc<dyn KeyValueStore>> {
        Ok(self.store.clone())
    }
}
