//! Copper Paws CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! paws-cli migrate
//!
//! # Create a superuser account
//! paws-cli superuser create -e owner@example.com -u owner -p <password>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `superuser create` - Create a privileged account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "paws-cli")]
#[command(author, version, about = "Copper Paws CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Manage superuser accounts
    Superuser {
        #[command(subcommand)]
        action: SuperuserAction,
    },
}

#[derive(Subcommand)]
enum SuperuserAction {
    /// Create a new superuser account
    Create {
        /// Email address (the login identity)
        #[arg(short, long)]
        email: String,

        /// Directory handle
        #[arg(short = 'u', long)]
        handle: String,

        /// Password; prefer the env var so it stays out of shell history
        #[arg(short, long, env = "PAWS_SUPERUSER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Superuser { action } => match action {
            SuperuserAction::Create {
                email,
                handle,
                password,
            } => {
                commands::superuser::create(&email, &handle, &password).await?;
            }
        },
    }
    Ok(())
}
