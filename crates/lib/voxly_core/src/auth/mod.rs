//! Authentication workflows.
//!
//! [`AuthService`] bundles the credential repository, password hasher,
//! token authority and session store, and exposes registration, login and
//! the session operations built on them. Every dependency is injected; the
//! service holds no global state.

pub mod jwt;
pub mod login;
pub mod password;
pub mod register;

use std::sync::Arc;

use chrono::Duration;

use crate::config::AuthConfig;
use crate::session::SessionManager;
use crate::users::UserRepository;

pub use jwt::{IssuedToken, TokenAuthority};
pub use login::{LoginOutcome, LoginRequest};
pub use password::PasswordHasher;
pub use register::{RegisterOutcome, RegisterRequest};

/// Registration, login and session workflows over injected collaborators.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenAuthority,
    sessions: Arc<SessionManager>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserRepository>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            users,
            hasher: PasswordHasher::default(),
            tokens: TokenAuthority::new(config.jwt_secret.as_bytes(), config.token_ttl),
            sessions,
            session_ttl: config.session_ttl,
        }
    }

    /// Replace the password hasher (e.g. a cheaper cost in tests).
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}
