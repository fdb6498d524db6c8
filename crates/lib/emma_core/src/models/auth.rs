//! Authentication domain models.
//!
//! These are internal domain models, distinct from the HTTP DTOs in
//! `emma_api::models` (which are renamed to camelCase for the wire).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role granting access to the admin console.
pub const ADMIN_ROLE: &str = "admin";

/// `typ` discriminator carried by access tokens.
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// `typ` discriminator carried by refresh tokens.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// The authenticated actor and its role set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub name: Option<String>,
    pub roles: BTreeSet<String>,
}

impl Principal {
    pub fn new<I, S>(id: impl Into<String>, name: Option<&str>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.map(str::to_string),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the principal holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl From<AccessClaims> for Principal {
    fn from(claims: AccessClaims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            roles: claims.roles.into_iter().collect(),
        }
    }
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: principal ID.
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Token discriminator, always `"access"` for tokens we mint.
    #[serde(default)]
    pub typ: Option<String>,
    /// Unique token ID.
    pub jti: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// JWT claims embedded in refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    /// Must be `"refresh"`; anything else is rejected by the refresh flow.
    #[serde(default)]
    pub typ: Option<String>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Freshly minted access + refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// A token pair together with the CSRF token bound to its access token.
///
/// Only produced by issuing a pair and binding it in one step, so the CSRF
/// token always belongs to `access_token`.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}
