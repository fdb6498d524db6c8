//! CSRF tokens bound to the access token.
//!
//! The CSRF token is `hex(HMAC-SHA256(csrf_secret, access_token))`. It carries
//! no payload and no expiry of its own; it is valid exactly while the access
//! token it was derived from is the one being presented.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::AuthError;
use super::guard::bearer_token;

type HmacSha256 = Hmac<Sha256>;

/// Request header carrying the CSRF token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Derives and checks CSRF tokens.
#[derive(Clone)]
pub struct CsrfBinder {
    mac: HmacSha256,
}

impl CsrfBinder {
    pub fn new(secret: &[u8]) -> Result<Self, AuthError> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| AuthError::Misconfiguration(format!("csrf secret: {e}")))?;
        Ok(Self { mac })
    }

    /// CSRF token for `access_token`.
    pub fn bind(&self, access_token: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(access_token.as_bytes());
        format!("{:x}", mac.finalize().into_bytes())
    }

    /// Check a request's `Authorization` and `X-CSRF-Token` header values.
    pub fn verify(
        &self,
        authorization: Option<&str>,
        csrf_token: Option<&str>,
    ) -> Result<(), AuthError> {
        let access_token = authorization
            .and_then(bearer_token)
            .ok_or_else(|| AuthError::Forbidden("Missing authorization token".into()))?;
        let provided =
            csrf_token.ok_or_else(|| AuthError::Forbidden("CSRF token missing".into()))?;

        let expected = self.bind(access_token);
        if bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) {
            Ok(())
        } else {
            Err(AuthError::Forbidden("CSRF token invalid".into()))
        }
    }
}
