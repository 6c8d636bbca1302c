//! Server-side session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An active login, stored under `session:<session_id>`.
///
/// Only `userId`, `createdAt` and `expiresAt` are persisted; the id is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip)]
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether `expires_at` has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
