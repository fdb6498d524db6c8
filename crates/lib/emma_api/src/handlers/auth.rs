//! Authentication request handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use tracing::{debug, info};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{AuthUser, LoginRequest, LogoutResponse, TokenResponse};
use crate::routes::REFRESH_TOKEN_HEADER;
use crate::services::auth;

/// `POST /auth/login`: authenticate with the admin password.
///
/// A body that is not a `{ "password": string }` JSON object is rejected like
/// a wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(body) = payload.map_err(|e| {
        debug!(error = %e, "malformed login body");
        AppError::Unauthorized("Invalid credentials".into())
    })?;
    let resp = auth::login(&state.auth, &body.password).await?;
    Ok(Json(resp))
}

/// `POST /auth/refresh`: exchange the `X-Refresh-Token` header for a new
/// token pair and CSRF token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<TokenResponse>> {
    let refresh_token = headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    let resp = auth::refresh(&state.auth, refresh_token).await?;
    Ok(Json(resp))
}

/// `GET /auth/me`: the authenticated admin.
pub async fn me_handler(Extension(user): Extension<AuthenticatedUser>) -> Json<AuthUser> {
    Json(user.0.into())
}

/// `POST /auth/logout`: acknowledges logout. Tokens are stateless, so the
/// client discards them; nothing is revoked server-side.
pub async fn logout_handler(Extension(user): Extension<AuthenticatedUser>) -> Json<LogoutResponse> {
    info!(sub = %user.0.id, "admin logged out");
    Json(LogoutResponse { ok: true })
}
