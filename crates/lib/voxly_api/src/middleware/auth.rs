//! Authentication middleware: bearer token plus live session.

use axum::http::HeaderName;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use voxly_core::models::session::Session;

use crate::AppState;
use crate::error::AppError;

/// Header carrying the session id returned by login.
pub const SESSION_HEADER: HeaderName = HeaderName::from_static("x-session-id");

/// The verified session, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub Session);

/// Axum middleware: requires `Authorization: Bearer <token>` and
/// `X-Session-Id: <id>`, checks both through the core, and injects
/// `AuthenticatedSession` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?
        .to_string();

    let session_id = request
        .headers()
        .get(&SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing session header".into()))?
        .to_string();

    let session = state
        .auth
        .authenticate(&token, &session_id)
        .await
        .map_err(|e| {
            if e.is_internal() {
                AppError::from(e)
            } else {
                debug!(reason = %e, "request not authenticated");
                AppError::Unauthorized("Invalid or expired session".into())
            }
        })?;

    request.extensions_mut().insert(AuthenticatedSession(session));

    Ok(next.run(request).await)
}
