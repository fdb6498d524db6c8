//! Refresh flow: exchange a refresh token for a new session.

use std::sync::Arc;

use tracing::{debug, error};

use super::AuthError;
use super::csrf::CsrfBinder;
use super::jwt::TokenIssuer;
use super::session::issue_session;
use super::store::PrincipalStore;
use crate::models::auth::{IssuedSession, REFRESH_TOKEN_TYPE, RefreshClaims};

/// The only message a failed refresh ever reports.
pub const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";

/// Exchanges refresh tokens for fresh sessions.
///
/// The principal is re-read from the store on every refresh, so role changes
/// take effect at the next refresh rather than at refresh-token expiry.
pub struct RefreshFlow {
    issuer: Arc<TokenIssuer>,
    csrf: Arc<CsrfBinder>,
    store: Arc<dyn PrincipalStore>,
}

impl RefreshFlow {
    pub fn new(
        issuer: Arc<TokenIssuer>,
        csrf: Arc<CsrfBinder>,
        store: Arc<dyn PrincipalStore>,
    ) -> Self {
        Self {
            issuer,
            csrf,
            store,
        }
    }

    /// Verify `refresh_token` and issue a new pair plus CSRF token.
    ///
    /// Every failure collapses to `Unauthorized(INVALID_REFRESH_TOKEN)`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedSession, AuthError> {
        self.try_refresh(refresh_token).await.map_err(|e| {
            match &e {
                AuthError::DbError(_) | AuthError::Internal(_) => {
                    error!(error = %e, "refresh failed")
                }
                _ => debug!(error = %e, "refresh rejected"),
            }
            AuthError::Unauthorized(INVALID_REFRESH_TOKEN.into())
        })
    }

    async fn try_refresh(&self, refresh_token: &str) -> Result<IssuedSession, AuthError> {
        let claims: RefreshClaims = self.issuer.verify(refresh_token)?;
        if claims.typ.as_deref() != Some(REFRESH_TOKEN_TYPE) {
            return Err(AuthError::Unauthorized("Invalid refresh token".into()));
        }

        let principal = self
            .store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AuthError::Unauthorized("Subject no longer exists".into()))?;

        issue_session(&self.issuer, &self.csrf, &principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::guard::SessionGuard;
    use crate::auth::store::MemoryPrincipalStore;
    use crate::models::auth::Principal;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::Duration as StdDuration;

    const JWT_SECRET: &[u8] = b"jwt-secret-0123456789abcdefghijklmnop";

    struct Fixture {
        issuer: Arc<TokenIssuer>,
        csrf: Arc<CsrfBinder>,
        flow: RefreshFlow,
    }

    fn fixture(principals: Vec<Principal>) -> Fixture {
        let issuer = Arc::new(
            TokenIssuer::new(
                JWT_SECRET,
                StdDuration::from_secs(15 * 60),
                StdDuration::from_secs(30 * 86400),
            )
            .unwrap(),
        );
        let csrf = Arc::new(CsrfBinder::new(b"csrf-secret-0123456789abcdefghijklmnop").unwrap());
        let store = Arc::new(MemoryPrincipalStore::new(principals));
        let flow = RefreshFlow::new(issuer.clone(), csrf.clone(), store);
        Fixture { issuer, csrf, flow }
    }

    fn admin() -> Principal {
        Principal::new("a1", Some("Alice"), ["admin"])
    }

    fn assert_generic(err: AuthError) {
        match err {
            AuthError::Unauthorized(msg) => assert_eq!(msg, INVALID_REFRESH_TOKEN),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refresh_issues_new_bound_session() {
        let f = fixture(vec![admin()]);
        let pair = f.issuer.issue(&admin()).unwrap();

        let session = f.flow.refresh(&pair.refresh).await.unwrap();
        assert_ne!(session.access_token, pair.access);
        assert_eq!(session.csrf_token, f.csrf.bind(&session.access_token));

        let principal = SessionGuard::new(f.issuer.clone())
            .authenticate(&session.access_token)
            .unwrap();
        assert_eq!(principal, admin());
    }

    #[tokio::test]
    async fn refresh_picks_up_current_roles() {
        let demoted = Principal::new("a1", Some("Alice"), ["user"]);
        let f = fixture(vec![demoted.clone()]);
        let pair = f.issuer.issue(&admin()).unwrap();

        let session = f.flow.refresh(&pair.refresh).await.unwrap();
        let principal = SessionGuard::new(f.issuer.clone())
            .authenticate(&session.access_token)
            .unwrap();
        assert_eq!(principal.roles, demoted.roles);
    }

    #[tokio::test]
    async fn access_token_is_not_a_refresh_token() {
        let f = fixture(vec![admin()]);
        let pair = f.issuer.issue(&admin()).unwrap();
        assert_generic(f.flow.refresh(&pair.access).await.unwrap_err());
    }

    #[tokio::test]
    async fn expired_refresh_token_is_generic() {
        let f = fixture(vec![admin()]);
        let pair = f
            .issuer
            .issue_at(&admin(), Utc::now() - Duration::days(31))
            .unwrap();
        assert_generic(f.flow.refresh(&pair.refresh).await.unwrap_err());
    }

    #[tokio::test]
    async fn tampered_refresh_token_is_generic() {
        let f = fixture(vec![admin()]);
        let pair = f.issuer.issue(&admin()).unwrap();
        // Refresh header and payload under the access token's signature.
        let (signed, _) = pair.refresh.rsplit_once('.').unwrap();
        let (_, access_sig) = pair.access.rsplit_once('.').unwrap();
        let tampered = format!("{signed}.{access_sig}");
        assert_generic(f.flow.refresh(&tampered).await.unwrap_err());
        assert_generic(f.flow.refresh("garbage").await.unwrap_err());
    }

    #[tokio::test]
    async fn missing_discriminator_is_generic() {
        let f = fixture(vec![admin()]);
        let now = Utc::now();
        let claims = serde_json::json!({
            "sub": "a1",
            "jti": "x",
            "iat": now.timestamp(),
            "exp": (now + Duration::days(1)).timestamp(),
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET),
        )
        .unwrap();
        assert_generic(f.flow.refresh(&token).await.unwrap_err());
    }

    #[tokio::test]
    async fn unknown_subject_is_generic() {
        let f = fixture(vec![]);
        let pair = f.issuer.issue(&admin()).unwrap();
        assert_generic(f.flow.refresh(&pair.refresh).await.unwrap_err());
    }
}
