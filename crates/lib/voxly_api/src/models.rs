//! Request and response bodies.
//!
//! Field names are camelCase on the wire. Missing request fields default to
//! empty strings so the core's validation reports them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voxly_core::auth::{LoginOutcome, RegisterOutcome};
use voxly_core::models::session::Session;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl From<RegisterRequest> for voxly_core::auth::RegisterRequest {
    fn from(r: RegisterRequest) -> Self {
        Self {
            username: r.username,
            password: r.password,
            email: r.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl From<RegisterOutcome> for RegisterResponse {
    fn from(o: RegisterOutcome) -> Self {
        Self {
            success: true,
            message: "User registered successfully".into(),
            user_id: Some(o.user_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<LoginRequest> for voxly_core::auth::LoginRequest {
    fn from(r: LoginRequest) -> Self {
        Self {
            email: r.email,
            password: r.password,
        }
    }
}

/// Expiry instants are unix seconds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user_id: String,
    pub token: String,
    pub session_id: String,
    pub token_expires_at: i64,
    pub session_expires_at: i64,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(o: LoginOutcome) -> Self {
        Self {
            success: true,
            user_id: o.user_id,
            token: o.token,
            session_id: o.session_id,
            token_expires_at: o.token_expires_at.timestamp(),
            session_expires_at: o.session_expires_at.timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(s: Session) -> Self {
        Self {
            session_id: s.session_id,
            user_id: s.user_id,
            created_at: s.created_at,
            expires_at: s.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}
