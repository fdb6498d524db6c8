//! PostgreSQL store tests. Skipped unless `EMMA_TEST_DATABASE_URL` points at a
//! database the tests may migrate and write to.

use std::time::Duration;

use emma_core::auth::PrincipalStore;
use emma_core::auth::queries::{PgPrincipalStore, ensure_admin, grant_role, upsert_user};
use emma_core::models::auth::ADMIN_ROLE;
use emma_core::uuid::uuidv7;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

async fn pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("EMMA_TEST_DATABASE_URL") else {
        eprintln!("skipping pg tests: set EMMA_TEST_DATABASE_URL");
        return None;
    };
    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(2))
        .connect(&url)
        .await
    {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("skipping pg tests: cannot connect to postgres: {err}");
            return None;
        }
    };
    emma_core::migrate::migrate(&pool).await.expect("migrate");
    Some(pool)
}

fn unique_email() -> String {
    format!("admin-{}@example.com", uuidv7())
}

#[tokio::test]
async fn ensure_admin_is_idempotent_and_visible_to_store() {
    let Some(pool) = pool().await else { return };
    let email = unique_email();

    let first = ensure_admin(&pool, &email, Some("Emma Admin")).await.unwrap();
    let second = ensure_admin(&pool, &email, None).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.name.as_deref(), Some("Emma Admin"));
    assert!(second.has_role(ADMIN_ROLE));
    assert_eq!(second.roles.len(), 1);

    let store = PgPrincipalStore::new(pool.clone());
    let found = store.find_by_id(&first.id).await.unwrap().unwrap();
    assert_eq!(found, second);
    assert!(store.find_admin().await.unwrap().is_some());
    assert!(store.find_by_id("not-a-uuid").await.unwrap().is_none());
}

#[tokio::test]
async fn failed_grant_rolls_back_the_user() {
    let Some(pool) = pool().await else { return };
    let email = unique_email();

    let mut tx = pool.begin().await.unwrap();
    let (user_id, _) = upsert_user(&mut *tx, &email, None).await.unwrap();
    // Rejected by the role CHECK constraint.
    assert!(grant_role(&mut *tx, &user_id, "superuser").await.is_err());
    drop(tx);

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
