use clap::{Parser, Subcommand};
use emma_core::auth::config::MIN_SECRET_LEN;

#[derive(Parser, Debug)]
#[command(name = "emma_cli", version, about = "Emma operator tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Hash a password with Argon2id for `ADMIN_PASSWORD_HASH`.
    HashPassword {
        password: String,
    },

    /// Check a password against an Argon2 hash. Exits non-zero on mismatch.
    VerifyPassword {
        /// Hash to check against.
        #[arg(long, env = "ADMIN_PASSWORD_HASH")]
        hash: String,

        password: String,
    },

    /// Generate a random secret for `JWT_SECRET` or `CSRF_SECRET`.
    GenerateSecret {
        #[arg(long, default_value_t = 64, value_parser = parse_secret_len)]
        length: usize,
    },

    /// Create (or update) the admin user in the database.
    SeedAdmin {
        /// PostgreSQL connection URL.
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,

        #[arg(long, default_value = "admin@example.com")]
        email: String,

        #[arg(long)]
        name: Option<String>,
    },

    /// Print version information.
    Version,
}

fn parse_secret_len(s: &str) -> Result<usize, String> {
    let len: usize = s.parse().map_err(|e| format!("{e}"))?;
    if len < MIN_SECRET_LEN {
        return Err(format!("secrets must be at least {MIN_SECRET_LEN} characters"));
    }
    Ok(len)
}
