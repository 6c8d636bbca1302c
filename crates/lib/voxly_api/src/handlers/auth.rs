//! Registration, login and logout handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedSession;
use crate::models::{LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, RegisterResponse};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(b)| b)
        .map_err(|_| AppError::Validation("Invalid request body".into()))
}

/// `POST /register`: create a new account.
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let req = body(payload)?;
    let outcome = state.auth.register(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// `POST /login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let req = body(payload)?;
    let outcome = state.auth.login(&req.into()).await?;
    Ok(Json(outcome.into()))
}

/// `POST /logout`: revoke the caller's session.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
) -> AppResult<Json<LogoutResponse>> {
    state.auth.logout(&session.session_id).await?;
    Ok(Json(LogoutResponse { success: true }))
}
