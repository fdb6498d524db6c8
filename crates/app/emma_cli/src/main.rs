// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use emma_core::auth::config::generate_secret;
use emma_core::auth::password::{hash_password, verify_password};
use sqlx::postgres::PgPoolOptions;

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::HashPassword { password } => {
            let hash = hash_password(&password)?;
            println!("{hash}");
            // Escaped so shells and dotenv loaders do not expand `$...`.
            println!("ADMIN_PASSWORD_HASH={}", hash.replace('$', "\\$"));
        }
        Commands::VerifyPassword { hash, password } => {
            if !verify_password(&password, &hash)? {
                return Err(Error::Custom("password does not match".into()));
            }
            println!("ok");
        }
        Commands::GenerateSecret { length } => {
            println!("{}", generate_secret(length));
        }
        Commands::SeedAdmin {
            database_url,
            email,
            name,
        } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(seed_admin(&database_url, &email, name.as_deref()))?;
        }
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

async fn seed_admin(database_url: &str, email: &str, name: Option<&str>) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await?;

    log::info!("running database migrations");
    emma_core::migrate::migrate(&pool).await?;

    let admin = emma_core::auth::queries::ensure_admin(&pool, email, name).await?;
    log::info!("admin {} ready with roles {:?}", admin.id, admin.roles);
    println!("{}", admin.id);

    pool.close().await;
    Ok(())
}
