//! Venue Verge CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending database migrations
//! vv-cli migrate
//!
//! # Create a venue owner (password from VV_USER_PASSWORD)
//! vv-cli user create -e owner@example.com -n "Olive Owner" -r owner
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create an activated user account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vv-cli")]
#[command(author, version, about = "Venue Verge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user (password is read from `VV_USER_PASSWORD`)
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`owner` or `customer`)
        #[arg(short, long, default_value = "customer")]
        role: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { email, name, role } => {
                commands::user::create(&email, &name, &role).await?;
            }
        },
    }
    Ok(())
}
