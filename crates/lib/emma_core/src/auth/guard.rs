//! Session guard: access token authentication and role gating.

use std::sync::Arc;

use super::AuthError;
use super::jwt::TokenIssuer;
use crate::models::auth::{ACCESS_TOKEN_TYPE, AccessClaims, Principal};

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authenticates access tokens into principals.
#[derive(Clone)]
pub struct SessionGuard {
    issuer: Arc<TokenIssuer>,
}

impl SessionGuard {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    /// Verify signature, expiry and the `access` discriminator of `token`.
    pub fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims: AccessClaims = self.issuer.verify(token)?;
        if claims.typ.as_deref() != Some(ACCESS_TOKEN_TYPE) {
            return Err(AuthError::Unauthorized("Invalid or expired token".into()));
        }
        Ok(Principal::from(claims))
    }

    /// Authenticate from a raw `Authorization` header value.
    pub fn authenticate_header(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        let header =
            header.ok_or_else(|| AuthError::Unauthorized("Missing authorization header".into()))?;
        let token = bearer_token(header)
            .ok_or_else(|| AuthError::Unauthorized("Invalid authorization scheme".into()))?;
        self.authenticate(token)
    }

    /// Role gate for protected routes.
    pub fn require_role(principal: &Principal, role: &str) -> Result<(), AuthError> {
        if principal.has_role(role) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized(format!(
                "{} role required",
                capitalize(role)
            )))
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
