//! # emma_api
//!
//! HTTP API library for Emma: admin login, token refresh, current-user lookup
//! and logout, guarded by JWT access tokens and CSRF binding.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use emma_core::auth::csrf::CSRF_HEADER;
use emma_core::auth::{AuthContext, AuthError, PrincipalStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, health};
use crate::middleware::auth::{require_admin, require_auth, require_csrf};
use crate::middleware::security::with_security_headers;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Auth components built from `config.auth`.
    pub auth: AuthContext,
    /// Process start, for the health endpoint's uptime.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ApiConfig, store: Arc<dyn PrincipalStore>) -> Result<Self, AuthError> {
        let auth = AuthContext::new(&config.auth, store)?;
        Ok(Self {
            config,
            auth,
            started_at: Instant::now(),
        })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.allowed_origin.clone())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(CSRF_HEADER),
            HeaderName::from_static(routes::REFRESH_TOKEN_HEADER),
        ]);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route(routes::POST_AUTH_LOGIN, post(auth::login_handler))
        .route(routes::POST_AUTH_ADMIN_LOGIN, post(auth::login_handler))
        .route(routes::POST_AUTH_REFRESH, post(auth::refresh_handler))
        .route(routes::POST_AUTH_ADMIN_REFRESH, post(auth::refresh_handler));

    // Admin-only reads. Layers run bottom-up: auth, then role.
    let admin = Router::new()
        .route(routes::GET_AUTH_ME, get(auth::me_handler))
        .route(routes::GET_AUTH_ADMIN_ME, get(auth::me_handler))
        .route_layer(axum::middleware::from_fn(require_admin))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // State-changing routes: auth, then CSRF binding.
    let mutating = Router::new()
        .route(routes::POST_AUTH_LOGOUT, post(auth::logout_handler))
        .route(routes::POST_AUTH_ADMIN_LOGOUT, post(auth::logout_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_csrf,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let app = Router::new()
        .merge(public)
        .merge(admin)
        .merge(mutating)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Outermost, so CORS preflights and rejections get the headers too.
    with_security_headers(app).with_state(state)
}
