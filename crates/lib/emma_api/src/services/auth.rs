//! Authentication service: login/refresh flows delegating to `emma_core::auth`.

use emma_core::auth::{AuthContext, AuthError};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::TokenResponse;

/// Admin password login.
///
/// The specific rejection reason is logged; the client only ever sees
/// "Invalid credentials".
pub async fn login(auth: &AuthContext, password: &str) -> AppResult<TokenResponse> {
    match auth.login(password).await {
        Ok(session) => Ok(session.into()),
        Err(AuthError::Unauthorized(reason)) => {
            warn!(%reason, "admin login rejected");
            Err(AppError::Unauthorized("Invalid credentials".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Exchange the refresh token from `X-Refresh-Token` for a new session.
pub async fn refresh(auth: &AuthContext, refresh_token: Option<&str>) -> AppResult<TokenResponse> {
    let refresh_token = refresh_token.filter(|t| !t.is_empty()).ok_or_else(|| {
        AppError::Unauthorized("Missing refresh token in X-Refresh-Token header".into())
    })?;

    let session = auth.refresh(refresh_token).await?;
    info!("session refreshed");
    Ok(session.into())
}
