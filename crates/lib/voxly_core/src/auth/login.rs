//! Login, request authentication and session revocation.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::AuthService;
use crate::error::{AuthError, AuthResult};
use crate::models::session::Session;
use crate::uuid::new_session_id;

/// Login credentials.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Result of a successful login: a bearer token and a server-side session.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user_id: String,
    pub token: String,
    pub session_id: String,
    pub token_expires_at: DateTime<Utc>,
    pub session_expires_at: DateTime<Utc>,
}

impl AuthService {
    /// Verify credentials, issue a token and open a session.
    ///
    /// If the session cannot be created the whole login fails and the
    /// already-issued token is dropped.
    pub async fn login(&self, req: &LoginRequest) -> AuthResult<LoginOutcome> {
        if req.email.trim().is_empty() || req.password.is_empty() {
            return Err(AuthError::Validation("Email and password are required".into()));
        }

        let user = self
            .users
            .find_by_email(&req.email)
            .await
            .inspect_err(|e| error!(error = %e, "user lookup failed"))?
            .ok_or_else(|| {
                warn!("login rejected: unknown email");
                AuthError::UserNotFound
            })?;

        let matches = self
            .hasher
            .verify(&req.password, &user.password_hash)
            .await
            .inspect_err(|e| error!(error = %e, user_id = %user.id, "password verification failed"))?;
        if !matches {
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let user_id = user.id.to_string();
        let issued = self
            .tokens
            .issue(&user_id)
            .inspect_err(|e| error!(error = %e, "token issuance failed"))?;

        let session_id = new_session_id();
        let session = self
            .sessions
            .create(&session_id, &user_id, self.session_ttl)
            .await
            .inspect_err(|e| error!(error = %e, %user_id, "session creation failed; discarding token"))?;

        info!(%user_id, "user logged in");
        Ok(LoginOutcome {
            user_id,
            token: issued.token,
            session_id,
            token_expires_at: issued.expires_at,
            session_expires_at: session.expires_at,
        })
    }

    /// Resolve a request's token and session. The session must exist and
    /// belong to the token's subject, so a revoked session denies access even
    /// while its token is still valid.
    pub async fn authenticate(&self, token: &str, session_id: &str) -> AuthResult<Session> {
        let user_id = self.tokens.verify(token)?;
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;
        if session.user_id != user_id {
            warn!(%user_id, "session presented with another user's token");
            return Err(AuthError::SessionNotFound);
        }
        Ok(session)
    }

    /// Extend a session by the configured session lifetime.
    pub async fn extend_session(&self, session_id: &str) -> AuthResult<Session> {
        self.sessions.extend(session_id, self.session_ttl).await
    }

    /// Revoke a session. Idempotent.
    pub async fn logout(&self, session_id: &str) -> AuthResult<()> {
        self.sessions.delete(session_id).await?;
        info!("session revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use chrono::Duration;

    use super::*;
    use crate::auth::test_support::{TEST_SECRET, memory_service};
    use crate::auth::{PasswordHasher, RegisterRequest};
    use crate::config::AuthConfig;
    use crate::error::TokenRejection;
    use crate::session::{KeyValueStore, MemoryStore, SessionManager, StoreConnector};
    use crate::users::MemoryUserRepository;

    async fn registered() -> (AuthService, crate::session::MemoryConnector) {
        let (svc, _, connector) = memory_service();
        svc.register(&RegisterRequest {
            username: "ana".into(),
            password: "pw123".into(),
            email: "a@x.com".into(),
        })
        .await
        .unwrap();
        (svc, connector)
    }

    fn creds(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Store that reads fine but refuses writes.
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn set_with_ttl(&self, _: &str, _: &str, _: StdDuration) -> AuthResult<()> {
            Err(AuthError::StoreUnavailable("READONLY replica".into()))
        }

        async fn get(&self, key: &str) -> AuthResult<Option<String>> {
            self.0.get(key).await
        }

        async fn delete(&self, key: &str) -> AuthResult<()> {
            self.0.delete(key).await
        }
    }

    struct ReadOnlyConnector;

    #[async_trait]
    impl StoreConnector for ReadOnlyConnector {
        async fn connect(&self) -> AuthResult<Arc<dyn KeyValueStore>> {
            Ok(Arc::new(ReadOnlyStore(MemoryStore::new())))
        }
    }

    #[tokio::test]
    async fn correct_credentials_yield_token_and_session() {
        let (svc, _) = registered().await;
        let before = Utc::now();
        let out = svc.login(&creds("a@x.com", "pw123")).await.unwrap();

        assert!(out.token_expires_at > Utc::now());
        assert!(out.session_expires_at > Utc::now());
        assert!(out.token_expires_at >= before + Duration::hours(24) - Duration::seconds(1));
        assert!(out.session_expires_at >= before + svc.session_ttl());

        assert_eq!(svc.tokens().verify(&out.token).unwrap(), out.user_id);
        let session = svc.sessions().get(&out.session_id).await.unwrap().unwrap();
        assert_eq!(session.user_id, out.user_id);
        assert_eq!(session.expires_at, out.session_expires_at);
    }

    #[tokio::test]
    async fn session_id_is_unrelated_to_token() {
        let (svc, _) = registered().await;
        let a = svc.login(&creds("a@x.com", "pw123")).await.unwrap();
        let b = svc.login(&creds("a@x.com", "pw123")).await.unwrap();
        assert_ne!(a.session_id, b.session_id);
        assert!(!a.token.contains(&a.session_id));
    }

    #[tokio::test]
    async fn wrong_password_creates_nothing() {
        let (svc, connector) = registered().await;
        let err = svc.login(&creds("a@x.com", "nope")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(connector.store().is_empty());
    }

    #[tokio::test]
    async fn unknown_email_is_user_not_found() {
        let (svc, connector) = registered().await;
        let err = svc.login(&creds("b@x.com", "pw123")).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        assert!(connector.store().is_empty());
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let (svc, _) = registered().await;
        let err = svc.login(&creds("A@X.COM", "pw123")).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let (svc, _) = registered().await;
        for req in [creds("", "pw123"), creds("a@x.com", "")] {
            assert!(matches!(
                svc.login(&req).await,
                Err(AuthError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn session_failure_fails_the_whole_login() {
        let users = Arc::new(MemoryUserRepository::new());
        let sessions = Arc::new(SessionManager::new(Arc::new(ReadOnlyConnector)));
        let svc = AuthService::new(&AuthConfig::with_secret(TEST_SECRET), users, sessions)
            .with_hasher(PasswordHasher::with_cost(4));
        svc.register(&RegisterRequest {
            username: "ana".into(),
            password: "pw123".into(),
            email: "a@x.com".into(),
        })
        .await
        .unwrap();

        let err = svc.login(&creds("a@x.com", "pw123")).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn token_and_session_lifetimes_are_independent() {
        let users = Arc::new(MemoryUserRepository::new());
        let sessions = Arc::new(SessionManager::new(Arc::new(
            crate::session::MemoryConnector::new(),
        )));
        let config = AuthConfig {
            jwt_secret: TEST_SECRET.into(),
            token_ttl: Duration::minutes(15),
            session_ttl: Duration::days(7),
        };
        let svc = AuthService::new(&config, users, sessions)
            .with_hasher(PasswordHasher::with_cost(4));
        svc.register(&RegisterRequest {
            username: "ana".into(),
            password: "pw123".into(),
            email: "a@x.com".into(),
        })
        .await
        .unwrap();

        let out = svc.login(&creds("a@x.com", "pw123")).await.unwrap();
        let gap = out.session_expires_at - out.token_expires_at;
        assert!(gap > Duration::days(6));
    }

    #[tokio::test]
    async fn authenticate_accepts_live_session() {
        let (svc, _) = registered().await;
        let out = svc.login(&creds("a@x.com", "pw123")).await.unwrap();
        let session = svc.authenticate(&out.token, &out.session_id).await.unwrap();
        assert_eq!(session.user_id, out.user_id);
        assert_eq!(session.session_id, out.session_id);
    }

    #[tokio::test]
    async fn logout_revokes_despite_valid_token() {
        let (svc, _) = registered().await;
        let out = svc.login(&creds("a@x.com", "pw123")).await.unwrap();
        svc.logout(&out.session_id).await.unwrap();
        svc.logout(&out.session_id).await.unwrap();

        assert!(svc.tokens().verify(&out.token).is_ok());
        let err = svc.authenticate(&out.token, &out.session_id).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn authenticate_rejects_foreign_session() {
        let (svc, _) = registered().await;
        svc.register(&RegisterRequest {
            username: "bob".into(),
            password: "pw456".into(),
            email: "b@x.com".into(),
        })
        .await
        .unwrap();
        let ana = svc.login(&creds("a@x.com", "pw123")).await.unwrap();
        let bob = svc.login(&creds("b@x.com", "pw456")).await.unwrap();

        let err = svc.authenticate(&ana.token, &bob.session_id).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn authenticate_rejects_bad_token() {
        let (svc, _) = registered().await;
        let out = svc.login(&creds("a@x.com", "pw123")).await.unwrap();
        let err = svc.authenticate("garbage", &out.session_id).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidToken(TokenRejection::Malformed)
        ));
    }

    #[tokio::test]
    async fn extend_session_moves_expiry() {
        let (svc, _) = registered().await;
        let out = svc.login(&creds("a@x.com", "pw123")).await.unwrap();
        tokio::time::sleep(StdDuration::from_millis(5)).await;
        let extended = svc.extend_session(&out.session_id).await.unwrap();
        assert!(extended.expires_at > out.session_expires_at);

        let err = svc.extend_session("missing").await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }
}
