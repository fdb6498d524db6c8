//! Authentication middleware: Bearer token verification, admin role gate and
//! CSRF binding check.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use emma_core::auth::SessionGuard;
use emma_core::auth::csrf::CSRF_HEADER;
use emma_core::models::auth::{ADMIN_ROLE, Principal};
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// Key used to store the authenticated `Principal` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = header_str(request.headers(), AUTHORIZATION.as_str());
    let principal = state.auth.guard().authenticate_header(header).map_err(|e| {
        debug!(error = %e, "access token rejected");
        AppError::from(e)
    })?;

    request.extensions_mut().insert(AuthenticatedUser(principal));

    Ok(next.run(request).await)
}

/// Axum middleware: requires the `admin` role. Must run after `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    SessionGuard::require_role(&user.0, ADMIN_ROLE)?;

    Ok(next.run(request).await)
}

/// Axum middleware: checks that `X-CSRF-Token` is bound to the presented
/// access token. Applied to state-changing routes.
pub async fn require_csrf(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    state
        .auth
        .csrf()
        .verify(
            header_str(headers, AUTHORIZATION.as_str()),
            header_str(headers, CSRF_HEADER),
        )
        .map_err(|e| {
            debug!(error = %e, "csrf check failed");
            AppError::from(e)
        })?;

    Ok(next.run(request).await)
}
