//! Authentication and authorization logic.
//!
//! Admin password verification, JWT access/refresh tokens, CSRF binding and
//! the request guard, shared by `emma_api` and `emma_cli`.

pub mod config;
pub mod csrf;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod queries;
pub mod refresh;
pub mod session;
pub mod store;

use thiserror::Error;

pub use config::AuthConfig;
pub use csrf::CsrfBinder;
pub use guard::SessionGuard;
pub use jwt::TokenIssuer;
pub use password::CredentialVerifier;
pub use refresh::RefreshFlow;
pub use session::AuthContext;
pub use store::{MemoryPrincipalStore, PrincipalStore};

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad, missing or expired credentials or tokens; the client must
    /// re-authenticate.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted (CSRF binding failure).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing or invalid secrets or hashes. Fatal at startup.
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
