//! In-process user repository for tests and local runs.

use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::models::auth::User;

/// Users held in memory, indexed by id.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: DashMap<Uuid, User>,
    // Serializes inserts so the uniqueness check and the write are one step.
    insert_lock: Mutex<()>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .iter()
            .find(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> AuthResult<Option<User>> {
        Ok(self.find(|u| u.username == username || u.email == email))
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self.find(|u| u.email == email))
    }

    async fn insert(&self, user: &User) -> AuthResult<()> {
        let _guard = self
            .insert_lock
            .lock()
            .map_err(|_| AuthError::Repository("user store lock poisoned".into()))?;
        let clash = self.find(|u| {
            u.id == user.id || u.username == user.username || u.email == user.email
        });
        if clash.is_some() {
            return Err(AuthError::DuplicateAccount);
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }
}
