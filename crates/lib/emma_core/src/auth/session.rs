//! Wiring of the auth components into one shareable context.

use std::sync::Arc;

use tracing::info;

use super::AuthError;
use super::config::AuthConfig;
use super::csrf::CsrfBinder;
use super::guard::SessionGuard;
use super::jwt::TokenIssuer;
use super::password::CredentialVerifier;
use super::refresh::RefreshFlow;
use super::store::PrincipalStore;
use crate::models::auth::{IssuedSession, Principal};

/// Issue a token pair and bind a CSRF token to its access token.
pub fn issue_session(
    issuer: &TokenIssuer,
    csrf: &CsrfBinder,
    principal: &Principal,
) -> Result<IssuedSession, AuthError> {
    let pair = issuer.issue(principal)?;
    let csrf_token = csrf.bind(&pair.access);
    Ok(IssuedSession {
        access_token: pair.access,
        refresh_token: pair.refresh,
        csrf_token,
    })
}

/// All auth components, built once from [`AuthConfig`] at startup.
#[derive(Clone)]
pub struct AuthContext {
    verifier: Arc<CredentialVerifier>,
    issuer: Arc<TokenIssuer>,
    csrf: Arc<CsrfBinder>,
    guard: SessionGuard,
    refresh: Arc<RefreshFlow>,
}

impl AuthContext {
    pub fn new(config: &AuthConfig, store: Arc<dyn PrincipalStore>) -> Result<Self, AuthError> {
        config.validate()?;

        let issuer = Arc::new(TokenIssuer::from_config(config)?);
        let csrf = Arc::new(CsrfBinder::new(config.csrf_secret.as_bytes())?);
        Ok(Self {
            verifier: Arc::new(CredentialVerifier::new(
                config.admin_password_hash.clone(),
                store.clone(),
            )),
            guard: SessionGuard::new(issuer.clone()),
            refresh: Arc::new(RefreshFlow::new(issuer.clone(), csrf.clone(), store)),
            issuer,
            csrf,
        })
    }

    /// Admin password login.
    pub async fn login(&self, password: &str) -> Result<IssuedSession, AuthError> {
        let principal = self.verifier.verify(password).await?;
        let session = issue_session(&self.issuer, &self.csrf, &principal)?;
        info!(sub = %principal.id, "admin logged in");
        Ok(session)
    }

    /// Exchange a refresh token for a new session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedSession, AuthError> {
        self.refresh.refresh(refresh_token).await
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    pub fn csrf(&self) -> &CsrfBinder {
        &self.csrf
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }
}
