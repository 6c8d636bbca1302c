//! # voxly_api
//!
//! HTTP API library for Voxly.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use voxly_core::auth::AuthService;

use crate::handlers::{auth, session};

/// Route paths.
pub mod routes {
    pub const POST_REGISTER: &str = "/register";
    pub const POST_LOGIN: &str = "/login";
    pub const POST_LOGOUT: &str = "/logout";
    pub const GET_SESSION: &str = "/session";
    pub const POST_SESSION_EXTEND: &str = "/session/extend";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and session workflows.
    pub auth: AuthService,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::POST_REGISTER, post(auth::register_handler))
        .route(routes::POST_LOGIN, post(auth::login_handler));

    // Protected routes (bearer token + live session)
    let protected = Router::new()
        .route(routes::POST_LOGOUT, post(auth::logout_handler))
        .route(routes::GET_SESSION, get(session::current_session_handler))
        .route(
            routes::POST_SESSION_EXTEND,
            post(session::extend_session_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
