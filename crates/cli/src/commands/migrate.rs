//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! paws-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use std::path::Path;

use secrecy::SecretString;
use sqlx::migrate::Migrator;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Run the storefront database migrations.
///
/// Reads the migration files from `crates/storefront/migrations/`, so this
/// must run from the workspace root.
pub async fn storefront() -> Result<(), MigrateError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = copper_paws_storefront::db::create_pool(&database_url).await?;

    let migrator = Migrator::new(Path::new("crates/storefront/migrations")).await?;
    migrator.run(&pool).await?;

    tracing::info!("Storefront migrations applied");

    Ok(())
}

fn database_url() -> Result<SecretString, MigrateError> {
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrateError::MissingEnvVar("STOREFRONT_DATABASE_URL"))
}
