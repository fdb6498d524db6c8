//! Emma API server binary.
//!
//! Loads `.env`, validates secrets, connects to PostgreSQL, runs migrations
//! and serves the admin API.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use emma_api::config::{ApiConfig, DEFAULT_FRONTEND_URL, Environment};
use emma_core::auth::AuthConfig;
use emma_core::auth::queries::PgPrincipalStore;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "emma_api_server", about = "Emma admin API server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Frontend URL allowed by CORS.
    #[arg(long, env = "FRONTEND_URL", default_value = DEFAULT_FRONTEND_URL)]
    frontend_url: String,

    /// Deployment environment: development, production or test.
    /// Falls back to `NODE_ENV`, then development.
    #[arg(long = "env", env = "APP_ENV")]
    environment: Option<Environment>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,emma_api=debug,emma_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    // Secrets are checked before anything touches the network.
    let auth = AuthConfig::from_env()?;
    let environment =
        Environment::resolve(args.environment, std::env::var("NODE_ENV").ok().as_deref())?;
    let config = ApiConfig::new(
        format!("{}:{}", args.host, args.port),
        &args.frontend_url,
        environment,
        auth,
    )?;

    info!(
        port = args.port,
        environment = %config.environment,
        max_connections = args.max_connections,
        "starting emma_api_server"
    );

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    emma_core::migrate::migrate(&pool).await?;

    let store = Arc::new(PgPrincipalStore::new(pool));
    let state = emma_api::AppState::new(config.clone(), store)?;
    let app = emma_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening on /api");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
