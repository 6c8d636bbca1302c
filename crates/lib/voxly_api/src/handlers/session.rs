//! Session inspection and extension handlers.

use axum::Json;
use axum::extract::{Extension, State};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedSession;
use crate::models::SessionResponse;

/// `GET /session`: the caller's current session.
pub async fn current_session_handler(
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
) -> Json<SessionResponse> {
    Json(session.into())
}

/// `POST /session/extend`: push the caller's session expiry out by the
/// configured session lifetime.
pub async fn extend_session_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
) -> AppResult<Json<SessionResponse>> {
    let extended = state.auth.extend_session(&session.session_id).await?;
    Ok(Json(extended.into()))
}
