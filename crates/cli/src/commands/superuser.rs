//! Superuser management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a superuser (password via env keeps it out of shell history)
//! PAWS_SUPERUSER_PASSWORD=... paws-cli superuser create -e owner@example.com -u owner
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//! - `PAWS_SUPERUSER_PASSWORD` - Password for the new account

use secrecy::SecretString;
use thiserror::Error;

use copper_paws_storefront::db;
use copper_paws_storefront::services::{AccountError, AccountService};

/// Errors that can occur during superuser operations.
#[derive(Debug, Error)]
pub enum SuperuserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Account validation or persistence failure.
    #[error("{0}")]
    Account(#[from] AccountError),
}

/// Create a new superuser account.
///
/// The bootstrap path for privileged accounts: same validation and
/// hashing as web registration, but with `is_admin`, `is_staff`, and
/// `is_superuser` all set. Email and handle are both required.
///
/// # Returns
///
/// The ID of the created account.
pub async fn create(email: &str, handle: &str, password: &str) -> Result<i32, SuperuserError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating superuser: {} ({})", email, handle);

    let service = AccountService::new(&pool);
    let account = service.create_superuser(email, handle, password).await?;

    tracing::info!(
        "Superuser created successfully! ID: {}, Email: {}, Handle: {}",
        account.id,
        account.email,
        account.handle
    );

    Ok(account.id.as_i32())
}

fn database_url() -> Result<SecretString, SuperuserError> {
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| SuperuserError::MissingEnvVar("STOREFRONT_DATABASE_URL"))
}
