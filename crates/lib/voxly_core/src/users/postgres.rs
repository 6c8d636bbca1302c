//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::models::auth::{Relationship, User};

type UserRow = (Uuid, String, String, String, DateTime<Utc>, bool, bool, i16);

const USER_COLUMNS: &str =
    "id, username, email, password_hash, registered_at, is_bot, is_online, relationship";

/// Users stored in the `users` table (see `migrations/`).
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: UserRow) -> AuthResult<User> {
    let (id, username, email, password_hash, registered_at, is_bot, is_online, rel) = row;
    let relationship = Relationship::from_code(rel)
        .ok_or_else(|| AuthError::Repository(format!("unknown relationship code {rel}")))?;
    Ok(User {
        id,
        username,
        email,
        password_hash,
        registered_at,
        is_bot,
        is_online,
        relationship,
    })
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $2 LIMIT 1"
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(user_from_row).transpose()
    }

    async fn insert(&self, user: &User) -> AuthResult<()> {
        // Unique violations surface as DuplicateAccount via From<sqlx::Error>.
        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.registered_at)
        .bind(user.is_bot)
        .bind(user.is_online)
        .bind(user.relationship.code())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
