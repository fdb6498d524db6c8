//! API server configuration.

use std::fmt;
use std::str::FromStr;

use axum::http::HeaderValue;
use emma_core::auth::{AuthConfig, AuthError};
use thiserror::Error;
use url::Url;

/// Default frontend origin allowed by CORS.
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:4200";

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("FRONTEND_URL must be a valid URL: {0}")]
    FrontendUrl(String),

    #[error("unknown environment {0:?} (expected development, production or test)")]
    Environment(String),
}

/// Deployment environment, reported by the health endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    /// Pick the environment from the `APP_ENV`/`--env` value, falling back to a
    /// `NODE_ENV` value and then to development. Empty values count as unset.
    pub fn resolve(
        explicit: Option<Environment>,
        node_env: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(env) = explicit {
            return Ok(env);
        }
        match node_env.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => value.parse(),
            None => Ok(Environment::default()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::Environment(s.to_string())),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// Origin allowed by CORS, derived from the frontend URL.
    pub allowed_origin: HeaderValue,
    pub environment: Environment,
    pub auth: AuthConfig,
}

impl ApiConfig {
    /// Validate and assemble the configuration.
    pub fn new(
        bind_addr: impl Into<String>,
        frontend_url: &str,
        environment: Environment,
        auth: AuthConfig,
    ) -> Result<Self, ConfigError> {
        auth.validate()?;
        Ok(Self {
            bind_addr: bind_addr.into(),
            allowed_origin: frontend_origin(frontend_url)?,
            environment,
            auth,
        })
    }
}

/// The `Origin` header value a browser sends for pages served from `url`.
fn frontend_origin(url: &str) -> Result<HeaderValue, ConfigError> {
    let parsed = Url::parse(url).map_err(|e| ConfigError::FrontendUrl(format!("{url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::FrontendUrl(format!(
            "{url}: scheme must be http or https"
        )));
    }
    HeaderValue::from_str(&parsed.origin().ascii_serialization())
        .map_err(|e| ConfigError::FrontendUrl(format!("{url}: {e}")))
}
