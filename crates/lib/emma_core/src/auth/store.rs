//! Principal lookup used by login and refresh.

use async_trait::async_trait;

use super::AuthError;
use crate::models::auth::{ADMIN_ROLE, Principal};

/// Read-only source of principals and their roles.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// The principal to log in as after the admin password checks out:
    /// the first user holding the `admin` role.
    async fn find_admin(&self) -> Result<Option<Principal>, AuthError>;

    /// Look up a principal by subject id, with its current roles.
    async fn find_by_id(&self, id: &str) -> Result<Option<Principal>, AuthError>;
}

/// Fixed, in-process principal list. Used for tests and for running the API
/// without a database.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrincipalStore {
    principals: Vec<Principal>,
}

impl MemoryPrincipalStore {
    pub fn new(principals: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            principals: principals.into_iter().collect(),
        }
    }
}

#[async_trait]
impl PrincipalStore for MemoryPrincipalStore {
    async fn find_admin(&self) -> Result<Option<Principal>, AuthError> {
        Ok(self
            .principals
            .iter()
            .find(|p| p.has_role(ADMIN_ROLE))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Principal>, AuthError> {
        Ok(self.principals.iter().find(|p| p.id == id).cloned())
    }
}
