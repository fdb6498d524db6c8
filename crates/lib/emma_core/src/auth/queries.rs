//! Auth-related database queries.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::AuthError;
use super::store::PrincipalStore;
use crate::models::auth::{ADMIN_ROLE, Principal};

/// Fetch the first user (by creation time) holding `role`, returning (id, name).
pub async fn find_first_user_with_role(
    pool: &PgPool,
    role: &str,
) -> Result<Option<(String, Option<String>)>, AuthError> {
    let row = sqlx::query_as::<_, (String, Option<String>)>(
        "SELECT u.id::text, u.name \
         FROM users u \
         JOIN user_roles r ON r.user_id = u.id \
         WHERE r.role = $1 \
         ORDER BY u.created_at, u.id \
         LIMIT 1",
    )
    .bind(role)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch a user by id, returning (id, name).
pub async fn find_user_by_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<(String, Option<String>)>, AuthError> {
    let row = sqlx::query_as::<_, (String, Option<String>)>(
        "SELECT id::text, name FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch roles for a user.
pub async fn get_user_roles<'e, E>(executor: E, user_id: &str) -> Result<Vec<String>, AuthError>
where
    E: PgExecutor<'e>,
{
    let rows =
        sqlx::query_scalar::<_, String>("SELECT role FROM user_roles WHERE user_id = $1::uuid")
            .bind(user_id)
            .fetch_all(executor)
            .await?;
    Ok(rows)
}

/// Create a user, or update the name of the existing user with that email.
/// Returns (id, name).
pub async fn upsert_user<'e, E>(
    executor: E,
    email: &str,
    name: Option<&str>,
) -> Result<(String, Option<String>), AuthError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, (String, Option<String>)>(
        "INSERT INTO users (email, name) VALUES ($1, $2) \
         ON CONFLICT (email) DO UPDATE \
         SET name = COALESCE(EXCLUDED.name, users.name), updated_at = now() \
         RETURNING id::text, name",
    )
    .bind(email)
    .bind(name)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

/// Grant a role to a user. Granting an existing role is a no-op.
pub async fn grant_role<'e, E>(executor: E, user_id: &str, role: &str) -> Result<(), AuthError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO user_roles (user_id, role) VALUES ($1::uuid, $2) \
         ON CONFLICT (user_id, role) DO NOTHING",
    )
    .bind(user_id)
    .bind(role)
    .execute(executor)
    .await?;
    Ok(())
}

/// Ensure an admin user with `email` exists. Returns its principal.
///
/// The user and its `admin` grant are written in one transaction.
pub async fn ensure_admin(
    pool: &PgPool,
    email: &str,
    name: Option<&str>,
) -> Result<Principal, AuthError> {
    let mut tx = pool.begin().await?;
    let (user_id, name) = upsert_user(&mut *tx, email, name).await?;
    grant_role(&mut *tx, &user_id, ADMIN_ROLE).await?;
    let roles = get_user_roles(&mut *tx, &user_id).await?;
    tx.commit().await?;
    Ok(Principal::new(user_id, name.as_deref(), roles))
}

/// PostgreSQL-backed [`PrincipalStore`].
#[derive(Debug, Clone)]
pub struct PgPrincipalStore {
    pool: PgPool,
}

impl PgPrincipalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalStore for PgPrincipalStore {
    async fn find_admin(&self) -> Result<Option<Principal>, AuthError> {
        let Some((id, name)) = find_first_user_with_role(&self.pool, ADMIN_ROLE).await? else {
            return Ok(None);
        };
        let roles = get_user_roles(&self.pool, &id).await?;
        Ok(Some(Principal::new(id, name.as_deref(), roles)))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Principal>, AuthError> {
        // Non-uuid subjects cannot exist in `users`.
        let Ok(user_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let Some((id, name)) = find_user_by_id(&self.pool, user_id).await? else {
            return Ok(None);
        };
        let roles = get_user_roles(&self.pool, &id).await?;
        Ok(Some(Principal::new(id, name.as_deref(), roles)))
    }
}
