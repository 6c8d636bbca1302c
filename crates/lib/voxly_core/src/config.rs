//! Configuration consumed by the core.
//!
//! Loading (env, CLI flags, `.env`) belongs to the binary; these are plain
//! values handed in once at startup.

use chrono::Duration;

/// Default bearer token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Default session lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Longest accepted token or session lifetime: ten years.
pub const MAX_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Default Redis port.
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Redis connect + initial `PING` budget.
pub const DEFAULT_REDIS_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Token and session settings.
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// Lifetime of issued bearer tokens.
    pub token_ttl: Duration,
    /// Lifetime of sessions created at login. Independent of `token_ttl`.
    pub session_ttl: Duration,
}

impl AuthConfig {
    /// Config with the given secret and default lifetimes.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
        }
    }

    /// Both lifetimes must lie in `(0, MAX_LIFETIME_SECS]`.
    pub fn validate(&self) -> Result<(), String> {
        let max = Duration::seconds(MAX_LIFETIME_SECS);
        for (name, ttl) in [("token", self.token_ttl), ("session", self.session_ttl)] {
            if ttl <= Duration::zero() {
                return Err(format!("{name} lifetime must be positive"));
            }
            if ttl > max {
                return Err(format!(
                    "{name} lifetime must not exceed {MAX_LIFETIME_SECS} seconds"
                ));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

/// Session store connection target.
#[derive(Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// Logical database index.
    pub db: i64,
    pub connect_timeout: std::time::Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_REDIS_PORT,
            password: None,
            db: 0,
            connect_timeout: std::time::Duration::from_secs(DEFAULT_REDIS_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("db", &self.db)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
