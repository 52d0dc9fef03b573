//! Novamart CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! novamart-cli migrate
//!
//! # Create an admin account
//! novamart-cli admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//!
//! # Seed the database with demo data
//! novamart-cli seed
//!
//! # Delete expired session tokens
//! novamart-cli prune-sessions
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "novamart-cli")]
#[command(author, version, about = "Novamart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database with demo accounts, categories, and products
    Seed,
    /// Delete expired session tokens
    PruneSessions,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => commands::seed::create_admin(&email, &name, &password).await?,
        },
        Commands::Seed => commands::seed::demo_data().await?,
        Commands::PruneSessions => commands::sessions::prune().await?,
    }
    Ok(())
}
