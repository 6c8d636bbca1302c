//! Credential repository.
//!
//! The workflows only see the [`UserRepository`] trait. Username and email
//! matching is case-sensitive in every backend.

mod memory;
mod postgres;

pub use memory::MemoryUserRepository;
pub use postgres::PgUserRepository;

use async_trait::async_trait;

use crate::error::AuthResult;
use crate::models::auth::User;

/// Lookup/insert capability over stored accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Any user whose username equals `username` OR whose email equals `email`.
    async fn find_by_username_or_email(&self, username: &str, email: &str)
    -> AuthResult<Option<User>>;

    /// The user registered under `email`.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Persist a new user. A username or email collision is
    /// `AuthError::DuplicateAccount`.
    async fn insert(&self, user: &User) -> AuthResult<()>;
}
