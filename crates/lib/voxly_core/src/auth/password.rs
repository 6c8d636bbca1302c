//! Password hashing via bcrypt.
//!
//! Hashing is CPU-bound, so both directions run on the blocking pool.

use crate::error::{AuthError, AuthResult};

/// bcrypt with a fixed cost factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Hasher with an explicit cost (bcrypt accepts 4..=31).
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh salt.
    pub async fn hash(&self, password: &str) -> AuthResult<String> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Hashing(format!("hash task: {e}")))?
            .map_err(|e| AuthError::Hashing(format!("bcrypt hash: {e}")))
    }

    /// Verify a password against a stored hash. `Ok(false)` means mismatch;
    /// an unreadable hash is an error.
    pub async fn verify(&self, password: &str, hash: &str) -> AuthResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(format!("verify task: {e}")))?
            .map_err(|e| AuthError::Hashing(format!("bcrypt verify: {e}")))
    }
}
