//! Request and response bodies (camelCase on the wire).

use emma_core::models::auth::{IssuedSession, Principal};
use serde::{Deserialize, Serialize};

/// `POST /auth/login` body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub password: String,
}

/// Login and refresh response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

impl From<IssuedSession> for TokenResponse {
    fn from(s: IssuedSession) -> Self {
        Self {
            access_token: s.access_token,
            refresh_token: s.refresh_token,
            csrf_token: s.csrf_token,
        }
    }
}

/// The current principal, as returned by `GET /auth/me`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub roles: Vec<String>,
    pub name: Option<String>,
}

impl From<Principal> for AuthUser {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            roles: p.roles.into_iter().collect(),
            name: p.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub environment: String,
}

/// Error body for every error raised by handlers and auth middleware.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
