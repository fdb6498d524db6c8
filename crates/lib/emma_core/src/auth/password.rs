//! Password hashing via Argon2id, and the admin credential verifier.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::{debug, warn};

use super::AuthError;
use super::store::PrincipalStore;
use crate::models::auth::Principal;

/// Hash a password with Argon2id, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("argon2 hash: {e}")))
}

/// Verify a password against an Argon2 PHC hash.
///
/// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AuthError::Internal(format!("argon2 parse: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Checks the admin password and resolves the admin principal.
pub struct CredentialVerifier {
    password_hash: String,
    store: Arc<dyn PrincipalStore>,
}

impl CredentialVerifier {
    pub fn new(password_hash: impl Into<String>, store: Arc<dyn PrincipalStore>) -> Self {
        Self {
            password_hash: password_hash.into(),
            store,
        }
    }

    /// Verify `password` against the configured hash, then look up the
    /// principal holding the admin role.
    pub async fn verify(&self, password: &str) -> Result<Principal, AuthError> {
        if self.password_hash.is_empty() {
            warn!("admin login attempted but no password hash is configured");
            return Err(AuthError::Unauthorized(
                "Admin password not configured".into(),
            ));
        }

        // Argon2 is deliberately slow; keep it off the async workers.
        let password = password.to_string();
        let hash = self.password_hash.clone();
        let matched = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password check task: {e}")))?;

        match matched {
            Ok(true) => {}
            Ok(false) => {
                debug!("admin password mismatch");
                return Err(AuthError::Unauthorized("Invalid password".into()));
            }
            Err(e) => {
                warn!(error = %e, "configured admin password hash is unusable");
                return Err(AuthError::Unauthorized("Authentication failed".into()));
            }
        }

        self.store
            .find_admin()
            .await?
            .ok_or_else(|| AuthError::Unauthorized("Admin user not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryPrincipalStore;

    fn admin() -> Principal {
        Principal::new("admin-1", Some("Admin"), ["admin"])
    }

    #[test]
    fn hash_is_argon2id_phc() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn verify_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-hash").is_err());
    }

    #[tokio::test]
    async fn verifier_returns_admin_principal() {
        let hash = hash_password("s3cret").unwrap();
        let store = Arc::new(MemoryPrincipalStore::new([admin()]));
        let verifier = CredentialVerifier::new(hash, store);

        let principal = verifier.verify("s3cret").await.unwrap();
        assert_eq!(principal, admin());
    }

    #[tokio::test]
    async fn verifier_rejects_wrong_password() {
        let hash = hash_password("s3cret").unwrap();
        let store = Arc::new(MemoryPrincipalStore::new([admin()]));
        let verifier = CredentialVerifier::new(hash, store);

        let err = verifier.verify("guess").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn verifier_rejects_when_hash_missing() {
        let store = Arc::new(MemoryPrincipalStore::new([admin()]));
        let verifier = CredentialVerifier::new("", store);

        let err = verifier.verify("").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn verifier_rejects_malformed_hash() {
        let store = Arc::new(MemoryPrincipalStore::new([admin()]));
        let verifier = CredentialVerifier::new("$argon2id$garbage", store);

        let err = verifier.verify("s3cret").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn verifier_requires_an_admin_in_the_store() {
        let hash = hash_password("s3cret").unwrap();
        let store = Arc::new(MemoryPrincipalStore::new([Principal::new(
            "u2",
            None,
            ["user"],
        )]));
        let verifier = CredentialVerifier::new(hash, store);

        let err = verifier.verify("s3cret").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(m) if m == "Admin user not found"));
    }
}
