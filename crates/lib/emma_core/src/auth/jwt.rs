//! JWT token generation and verification.
//!
//! Access and refresh tokens are HS256 JWTs signed with the same secret and
//! told apart by their `typ` claim.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::AuthError;
use super::config::AuthConfig;
use crate::models::auth::{
    ACCESS_TOKEN_TYPE, AccessClaims, Principal, REFRESH_TOKEN_TYPE, RefreshClaims, TokenPair,
};
use crate::uuid::uuidv7;

/// Mints and verifies signed access/refresh tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        secret: &[u8],
        access_ttl: std::time::Duration,
        refresh_ttl: std::time::Duration,
    ) -> Result<Self, AuthError> {
        let to_chrono = |d: std::time::Duration| {
            Duration::from_std(d)
                .map_err(|e| AuthError::Misconfiguration(format!("token lifetime: {e}")))
        };
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: to_chrono(access_ttl)?,
            refresh_ttl: to_chrono(refresh_ttl)?,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.access_ttl,
            config.refresh_ttl,
        )
    }

    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Issue an access + refresh pair for `principal`, valid from now.
    pub fn issue(&self, principal: &Principal) -> Result<TokenPair, AuthError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue a pair as if the current time were `now`.
    pub fn issue_at(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let access = AccessClaims {
            sub: principal.id.clone(),
            name: principal.name.clone(),
            roles: principal.roles.iter().cloned().collect(),
            typ: Some(ACCESS_TOKEN_TYPE.to_string()),
            jti: uuidv7().to_string(),
            iat: now.timestamp(),
            exp: expiry(now, self.access_ttl)?,
        };
        let refresh = RefreshClaims {
            sub: principal.id.clone(),
            typ: Some(REFRESH_TOKEN_TYPE.to_string()),
            jti: uuidv7().to_string(),
            iat: now.timestamp(),
            exp: expiry(now, self.refresh_ttl)?,
        };

        Ok(TokenPair {
            access: self.sign(&access)?,
            refresh: self.sign(&refresh)?,
        })
    }

    /// Check signature and expiry, returning the decoded claims.
    ///
    /// Does not look at `typ`; callers decide which discriminator they accept.
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, AuthError> {
        decode::<T>(token, &self.decoding, &validation())
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "jwt rejected");
                AuthError::Unauthorized("Invalid or expired token".into())
            })
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> Result<i64, AuthError> {
    now.checked_add_signed(ttl)
        .map(|t| t.timestamp())
        .ok_or_else(|| AuthError::Internal("token expiry out of range".into()))
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}
