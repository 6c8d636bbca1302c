//! Redis-backed session storage.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use super::store::{KeyValueStore, StoreConnector};
use crate::config::RedisConfig;
use crate::error::{AuthError, AuthResult};

/// Redis connection shared by all requests. `ConnectionManager` is a cheap
/// clone over one multiplexed connection and reconnects on its own.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AuthResult<()> {
        let millis = u64::try_from(ttl.as_millis())
            .map_err(|_| AuthError::Validation("ttl too large".into()))?;
        if millis == 0 {
            return Err(AuthError::Validation("ttl must be at least 1ms".into()));
        }
        let mut conn = self.conn.clone();
        conn.pset_ex::<_, _, ()>(key, value, millis).await?;
        debug!(ttl_ms = millis, "redis PSETEX");
        Ok(())
    }

    async fn get(&self, key: &str) -> AuthResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        debug!(hit = value.is_some(), "redis GET");
        Ok(value)
    }

    async fn delete(&self, key: &str) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        debug!("redis DEL");
        Ok(())
    }
}

/// Connects to Redis and verifies the link with `PING`.
#[derive(Debug, Clone)]
pub struct RedisConnector {
    config: RedisConfig,
}

impl RedisConnector {
    pub fn new(config: RedisConfig) -> Self {
        Self { config }
    }

    fn connection_info(&self) -> redis::ConnectionInfo {
        redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(self.config.host.clone(), self.config.port),
            redis: redis::RedisConnectionInfo {
                db: self.config.db,
                password: self.config.password.clone(),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl StoreConnector for RedisConnector {
    async fn connect(&self) -> AuthResult<Arc<dyn KeyValueStore>> {
        let cfg = &self.config;
        info!(host = %cfg.host, port = cfg.port, db = cfg.db, "connecting to redis");

        let client = redis::Client::open(self.connection_info())?;
        let connect = async {
            let mut conn = ConnectionManager::new(client).await?;
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(conn)
        };
        let conn = tokio::time::timeout(cfg.connect_timeout, connect)
            .await
            .map_err(|_| {
                AuthError::StoreUnavailable(format!(
                    "timed out after {:?} connecting to {}:{}",
                    cfg.connect_timeout, cfg.host, cfg.port
                ))
            })??;

        info!("redis connection established");
        Ok(Arc::new(RedisStore { conn }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_info_carries_target() {
        let connector = RedisConnector::new(RedisConfig {
            host: "cache.internal".into(),
            port: 6380,
            password: Some("pw".into()),
            db: 3,
            ..RedisConfig::default()
        });
        let info = connector.connection_info();
        assert_eq!(
            info.addr,
            redis::ConnectionAddr::Tcp("cache.internal".into(), 6380)
        );
        assert_eq!(info.redis.db, 3);
        assert_eq!(info.redis.password.as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn unreachable_server_is_store_unavailable() {
        // Port 1 on loopback refuses connections.
        let connector = RedisConnector::new(RedisConfig {
            host: "127.0.0.1".into(),
            port: 1,
            connect_timeout: Duration::from_secs(2),
            ..RedisConfig::default()
        });
        let err = connector.connect().await.err().expect("connect should fail");
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }
}
