//! Auth configuration: secrets and token lifetimes, loaded once at startup.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

use super::AuthError;

/// Default access token lifetime.
pub const DEFAULT_ACCESS_EXPIRES: &str = "15m";

/// Default refresh token lifetime.
pub const DEFAULT_REFRESH_EXPIRES: &str = "30d";

/// Minimum length for the signing and CSRF secrets.
pub const MIN_SECRET_LEN: usize = 32;

/// Immutable auth configuration shared by every auth component.
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access and refresh tokens.
    pub jwt_secret: String,
    /// HMAC secret for CSRF tokens. Must differ from `jwt_secret`.
    pub csrf_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Argon2 PHC hash of the admin password.
    pub admin_password_hash: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[redacted]")
            .field("csrf_secret", &"[redacted]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("admin_password_hash", &"[redacted]")
            .finish()
    }
}

impl AuthConfig {
    /// Build and validate a config from raw values.
    ///
    /// Expiry strings use the `<digits><s|m|h|d>` form, e.g. `15m` or `30d`.
    pub fn new(
        jwt_secret: impl Into<String>,
        csrf_secret: impl Into<String>,
        access_expires: &str,
        refresh_expires: &str,
        admin_password_hash: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let mut problems = Vec::new();
        let access_ttl = parse_expiry("JWT_ACCESS_EXPIRES", access_expires)
            .map_err(|e| problems.push(e))
            .unwrap_or_default();
        let refresh_ttl = parse_expiry("JWT_REFRESH_EXPIRES", refresh_expires)
            .map_err(|e| problems.push(e))
            .unwrap_or_default();

        let config = Self {
            jwt_secret: jwt_secret.into(),
            csrf_secret: csrf_secret.into(),
            access_ttl,
            refresh_ttl,
            admin_password_hash: admin_password_hash.into(),
        };
        problems.extend(config.problems());

        if problems.is_empty() {
            Ok(config)
        } else {
            Err(AuthError::Misconfiguration(problems.join("; ")))
        }
    }

    /// Reads configuration from environment variables.
    ///
    /// | Variable              | Default  |
    /// |-----------------------|----------|
    /// | `JWT_SECRET`          | required |
    /// | `CSRF_SECRET`         | required |
    /// | `JWT_ACCESS_EXPIRES`  | `15m`    |
    /// | `JWT_REFRESH_EXPIRES` | `30d`    |
    /// | `ADMIN_PASSWORD_HASH` | required |
    pub fn from_env() -> Result<Self, AuthError> {
        Self::new(
            env_var("JWT_SECRET").unwrap_or_default(),
            env_var("CSRF_SECRET").unwrap_or_default(),
            &env_var("JWT_ACCESS_EXPIRES").unwrap_or_else(|| DEFAULT_ACCESS_EXPIRES.into()),
            &env_var("JWT_REFRESH_EXPIRES").unwrap_or_else(|| DEFAULT_REFRESH_EXPIRES.into()),
            env_var("ADMIN_PASSWORD_HASH").unwrap_or_default(),
        )
    }

    /// Re-check the invariants `new` enforces.
    pub fn validate(&self) -> Result<(), AuthError> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Misconfiguration(problems.join("; ")))
        }
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            problems.push(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LEN} characters"
            ));
        }
        if self.csrf_secret.len() < MIN_SECRET_LEN {
            problems.push(format!(
                "CSRF_SECRET must be at least {MIN_SECRET_LEN} characters"
            ));
        }
        if !self.jwt_secret.is_empty() && self.jwt_secret == self.csrf_secret {
            problems.push("CSRF_SECRET must differ from JWT_SECRET".to_string());
        }
        if !self.admin_password_hash.starts_with("$argon2") {
            problems.push("ADMIN_PASSWORD_HASH must be an argon2 hash".to_string());
        }
        for (name, ttl) in [
            ("JWT_ACCESS_EXPIRES", self.access_ttl),
            ("JWT_REFRESH_EXPIRES", self.refresh_ttl),
        ] {
            if ttl.is_zero() {
                problems.push(format!("{name} must be non-zero"));
            } else if !fits_from_now(ttl) {
                problems.push(format!("{name} is too large"));
            }
        }
        problems
    }
}

/// Parse an expiry like `15m`, `1h` or `30d`.
pub fn parse_expiry(name: &str, value: &str) -> Result<Duration, String> {
    let invalid = || format!("{name} must be in format like \"15m\", \"1h\", \"30d\" (got {value:?})");

    let Some(unit) = value.chars().last() else {
        return Err(invalid());
    };
    let digits = &value[..value.len() - unit.len_utf8()];
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || !matches!(unit, 's' | 'm' | 'h' | 'd')
    {
        return Err(invalid());
    }
    humantime::parse_duration(value).map_err(|_| invalid())
}

/// Whether a token issued now with lifetime `ttl` has a representable expiry.
fn fits_from_now(ttl: Duration) -> bool {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .is_some()
}

/// Generate a random alphanumeric secret of `len` characters.
pub fn generate_secret(len: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
