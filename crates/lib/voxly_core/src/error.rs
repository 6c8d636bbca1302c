//! Error taxonomy shared by the token, session, registration and login flows.

use std::fmt;

use thiserror::Error;

/// Convenience alias for core results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// `exp` is in the past.
    Expired,
    /// `nbf` is in the future.
    NotYetValid,
    /// Signature does not match the configured key.
    BadSignature,
    /// Not a parseable token, or required claims are missing.
    Malformed,
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenRejection::Expired => "expired",
            TokenRejection::NotYetValid => "not yet valid",
            TokenRejection::BadSignature => "bad signature",
            TokenRejection::Malformed => "malformed",
        };
        f.write_str(s)
    }
}

/// Authentication and session errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("An account with the provided details already exists")]
    DuplicateAccount,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Invalid token: {0}")]
    InvalidToken(TokenRejection),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Corrupt session record: {0}")]
    CorruptRecord(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Infrastructure failures: not user-correctable, never shown to clients in detail.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Repository(_)
                | AuthError::StoreUnavailable(_)
                | AuthError::CorruptRecord(_)
                | AuthError::Signing(_)
                | AuthError::Hashing(_)
        )
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::DuplicateAccount,
            _ => AuthError::Repository(e.to_string()),
        }
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(e: redis::RedisError) -> Self {
        AuthError::StoreUnavailable(e.to_string())
    }
}
