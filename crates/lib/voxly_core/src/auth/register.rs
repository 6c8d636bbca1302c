//! Account registration.

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::AuthService;
use crate::error::{AuthError, AuthResult};
use crate::models::auth::{Relationship, User};
use crate::uuid::new_user_id;

/// Candidate account fields.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// A created account.
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    pub user_id: Uuid,
}

impl RegisterRequest {
    fn validate(&self) -> AuthResult<()> {
        if self.username.trim().is_empty()
            || self.password.is_empty()
            || self.email.trim().is_empty()
        {
            return Err(AuthError::Validation(
                "Username, password, and email are required".into(),
            ));
        }
        Ok(())
    }
}

impl AuthService {
    /// Create an account: uniqueness check, hash, persist. Steps run in
    /// order and the first failure ends the workflow.
    pub async fn register(&self, req: &RegisterRequest) -> AuthResult<RegisterOutcome> {
        req.validate()?;

        let existing = self
            .users
            .find_by_username_or_email(&req.username, &req.email)
            .await
            .inspect_err(|e| error!(error = %e, "lookup for existing user failed"))?;
        if existing.is_some() {
            warn!(username = %req.username, "registration rejected: account exists");
            return Err(AuthError::DuplicateAccount);
        }

        let password_hash = self
            .hasher
            .hash(&req.password)
            .await
            .inspect_err(|e| error!(error = %e, "password hashing failed"))?;

        let user = User {
            id: new_user_id(),
            username: req.username.clone(),
            email: req.email.clone(),
            password_hash,
            registered_at: Utc::now(),
            is_bot: false,
            is_online: false,
            relationship: Relationship::None,
        };

        self.users.insert(&user).await.inspect_err(|e| {
            if e.is_internal() {
                error!(error = %e, "inserting new user failed");
            }
        })?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(RegisterOutcome { user_id: user.id })
    }
}
