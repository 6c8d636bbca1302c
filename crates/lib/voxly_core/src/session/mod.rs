//! Server-side session store.
//!
//! Sessions live in a key-value backend with a TTL equal to their remaining
//! lifetime, so presence in the store means "not expired". The backend
//! connection is opened once per [`SessionManager`]: concurrent first callers
//! wait on the same attempt, and a failed attempt is remembered so every
//! later operation fails with `StoreUnavailable` instead of retrying.

mod memory;
mod redis_store;
pub mod store;

pub use memory::{MemoryConnector, MemoryStore};
pub use redis_store::{RedisConnector, RedisStore};
pub use store::{KeyValueStore, StoreConnector};

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::error::{AuthError, AuthResult};
use crate::models::session::Session;

/// Key namespace for session records.
pub const SESSION_KEY_PREFIX: &str = "session";

type Connection = Result<Arc<dyn KeyValueStore>, String>;

/// Create/read/extend/revoke sessions in a TTL-backed store.
pub struct SessionManager {
    connector: Arc<dyn StoreConnector>,
    conn: OnceCell<Connection>,
}

impl SessionManager {
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            conn: OnceCell::new(),
        }
    }

    /// Open the backend connection. Idempotent; the outcome of the first
    /// attempt is final for the lifetime of this manager.
    pub async fn initialize(&self) -> AuthResult<()> {
        self.store().await.map(|_| ())
    }

    async fn store(&self) -> AuthResult<Arc<dyn KeyValueStore>> {
        let conn = self
            .conn
            .get_or_init(|| async {
                match self.connector.connect().await {
                    Ok(store) => {
                        info!("session store initialized");
                        Ok(store)
                    }
                    Err(e) => {
                        error!(error = %e, "session store initialization failed");
                        Err(e.to_string())
                    }
                }
            })
            .await;
        conn.clone().map_err(AuthError::StoreUnavailable)
    }

    fn key(session_id: &str) -> String {
        format!("{SESSION_KEY_PREFIX}:{session_id}")
    }

    fn ttl(duration: Duration) -> AuthResult<std::time::Duration> {
        if duration <= Duration::zero() {
            return Err(AuthError::Validation(
                "session duration must be positive".into(),
            ));
        }
        duration
            .to_std()
            .map_err(|e| AuthError::Validation(format!("session duration: {e}")))
    }

    fn expiry_from(now: DateTime<Utc>, duration: Duration) -> AuthResult<DateTime<Utc>> {
        now.checked_add_signed(duration)
            .ok_or_else(|| AuthError::Validation("session duration out of range".into()))
    }

    async fn write(&self, session: &Session, ttl: std::time::Duration) -> AuthResult<()> {
        let data = serde_json::to_string(session)
            .map_err(|e| AuthError::CorruptRecord(format!("serialize session: {e}")))?;
        self.store()
            .await?
            .set_with_ttl(&Self::key(&session.session_id), &data, ttl)
            .await
    }

    /// Store a new session for `user_id` expiring `duration` from now.
    pub async fn create(
        &self,
        session_id: &str,
        user_id: &str,
        duration: Duration,
    ) -> AuthResult<Session> {
        let ttl = Self::ttl(duration)?;
        let now = Utc::now();
        let session = Session {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: Self::expiry_from(now, duration)?,
        };
        self.write(&session, ttl).await?;
        debug!(user_id, expires_at = %session.expires_at, "session created");
        Ok(session)
    }

    /// Load a session. Unknown and expired ids are `Ok(None)`; a record the
    /// backend still holds past its `expiresAt` counts as expired.
    pub async fn get(&self, session_id: &str) -> AuthResult<Option<Session>> {
        let Some(data) = self.store().await?.get(&Self::key(session_id)).await? else {
            return Ok(None);
        };
        let mut session: Session = serde_json::from_str(&data)
            .map_err(|e| AuthError::CorruptRecord(format!("deserialize session: {e}")))?;
        if session.is_expired_at(Utc::now()) {
            debug!(user_id = %session.user_id, "stale session record ignored");
            return Ok(None);
        }
        session.session_id = session_id.to_string();
        Ok(Some(session))
    }

    /// Push a session's expiry to `duration` from now and reset its TTL.
    ///
    /// Read-then-write; concurrent extenders of one session race with
    /// last-writer-wins.
    pub async fn extend(&self, session_id: &str, duration: Duration) -> AuthResult<Session> {
        let ttl = Self::ttl(duration)?;
        let mut session = self
            .get(session_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;
        session.expires_at = Self::expiry_from(Utc::now(), duration)?;
        self.write(&session, ttl).await?;
        debug!(user_id = %session.user_id, expires_at = %session.expires_at, "session extended");
        Ok(session)
    }

    /// Remove a session. Deleting an absent session is not an error.
    pub async fn delete(&self, session_id: &str) -> AuthResult<()> {
        self.store().await?.delete(&Self::key(session_id)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    fn manager() -> (SessionManager, MemoryConnector) {
        let connector = MemoryConnector::new();
        (SessionManager::new(Arc::new(connector.clone())), connector)
    }

    /// Connector that counts attempts and optionally fails.
    struct CountingConnector {
        attempts: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl StoreConnector for CountingConnector {
        async fn connect(&self) -> AuthResult<Arc<dyn KeyValueStore>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            if self.fail {
                Err(AuthError::StoreUnavailable("connection refused".into()))
            } else {
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    #[tokio::test]
    async fn create_then_get_roundtrips() {
        let (sm, _) = manager();
        let created = sm.create("s1", "u1", Duration::hours(1)).await.unwrap();
        let loaded = sm.get("s1").await.unwrap().expect("session present");
        assert_eq!(loaded, created);
        assert_eq!(loaded.expires_at - loaded.created_at, Duration::hours(1));
    }

    #[tokio::test]
    async fn record_is_namespaced_json() {
        let (sm, connector) = manager();
        sm.create("s1", "u1", Duration::hours(1)).await.unwrap();
        let raw = connector
            .store()
            .get("session:s1")
            .await
            .unwrap()
            .expect("raw record");
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["userId"], "u1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("expiresAt").is_some());
    }

    #[tokio::test]
    async fn unknown_session_is_absent() {
        let (sm, _) = manager();
        assert!(sm.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_disappears_after_duration() {
        let (sm, _) = manager();
        sm.create("s1", "u1", Duration::milliseconds(20))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(sm.get("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn extend_missing_session_fails() {
        let (sm, _) = manager();
        let err = sm.extend("missing", Duration::hours(1)).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn extend_pushes_expiry_forward() {
        let (sm, _) = manager();
        let created = sm.create("s1", "u1", Duration::hours(1)).await.unwrap();
        let extended = sm.extend("s1", Duration::hours(2)).await.unwrap();
        assert!(extended.expires_at > created.expires_at);
        assert_eq!(extended.created_at, created.created_at);

        let loaded = sm.get("s1").await.unwrap().unwrap();
        assert_eq!(loaded.expires_at, extended.expires_at);
    }

    #[tokio::test]
    async fn extend_resets_store_ttl() {
        let (sm, _) = manager();
        sm.create("s1", "u1", Duration::milliseconds(200))
            .await
            .unwrap();
        sm.extend("s1", Duration::hours(1)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        assert!(sm.get("s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (sm, _) = manager();
        sm.create("s1", "u1", Duration::hours(1)).await.unwrap();
        sm.delete("s1").await.unwrap();
        sm.delete("s1").await.unwrap();
        assert!(sm.get("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_positive_duration_is_rejected() {
        let (sm, _) = manager();
        for d in [Duration::zero(), Duration::seconds(-5)] {
            let err = sm.create("s1", "u1", d).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)));
        }
        assert!(sm.get("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn out_of_range_duration_is_rejected() {
        let (sm, _) = manager();
        let huge = Duration::days(1_000_000_000);
        let err = sm.create("s1", "u1", huge).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        sm.create("s1", "u1", Duration::hours(1)).await.unwrap();
        let err = sm.extend("s1", huge).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert!(sm.get("s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn record_past_its_expiry_is_absent() {
        let (sm, connector) = manager();
        let past = Utc::now() - Duration::minutes(5);
        let stale = Session {
            session_id: String::new(),
            user_id: "u1".into(),
            created_at: past - Duration::hours(1),
            expires_at: past,
        };
        connector
            .store()
            .set_with_ttl(
                "session:stale",
                &serde_json::to_string(&stale).unwrap(),
                std::time::Duration::from_secs(60),
            )
            .await
            .unwrap();
        assert!(sm.get("stale").await.unwrap().is_none());
        let err = sm.extend("stale", Duration::hours(1)).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn corrupt_record_is_reported() {
        let (sm, connector) = manager();
        connector
            .store()
            .set_with_ttl("session:bad", "{not json", std::time::Duration::from_secs(60))
            .await
            .unwrap();
        let err = sm.get("bad").await.unwrap_err();
        assert!(matches!(err, AuthError::CorruptRecord(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_use_connects_once() {
        let connector = Arc::new(CountingConnector {
            attempts: AtomicUsize::new(0),
            fail: false,
        });
        let sm = Arc::new(SessionManager::new(connector.clone()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let sm = sm.clone();
            handles.push(tokio::spawn(async move {
                sm.create(&format!("s{i}"), "u1", Duration::hours(1)).await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
        assert!(sm.get("s7").await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn failed_initialization_is_sticky() {
        let connector = Arc::new(CountingConnector {
            attempts: AtomicUsize::new(0),
            fail: true,
        });
        let sm = Arc::new(SessionManager::new(connector.clone()));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let sm = sm.clone();
            handles.push(tokio::spawn(async move { sm.initialize().await }));
        }
        for h in handles {
            let err = h.await.unwrap().unwrap_err();
            assert!(matches!(err, AuthError::StoreUnavailable(_)));
        }

        let err = sm.get("s1").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
        let err = sm.delete("s1").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
    }
}
