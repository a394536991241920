//! Basket CLI - database migrations and operator tasks.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! basket migrate
//!
//! # Create a user (password from --password or BASKET_USER_PASSWORD)
//! basket user create -e alex@example.com -n "Alex"
//!
//! # Create the default grocery categories
//! basket seed categories
//!
//! # Let sam@example.com see alex@example.com's lists
//! basket share grant --from alex@example.com --to sam@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `BASKET_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "basket")]
#[command(author, version, about = "Basket operator tools")]
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
    /// Seed reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage shared list access
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name (defaults to the part of the email before `@`)
        #[arg(short, long, default_value = "")]
        name: String,

        /// Password, at least 8 characters
        #[arg(short, long, env = "BASKET_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create the default grocery categories
    Categories,
}

#[derive(Subcommand)]
enum ShareAction {
    /// Grant one account access to another's lists
    Grant {
        /// Email of the account whose lists are shared
        #[arg(long = "from")]
        grantor: String,

        /// Email of the account receiving access
        #[arg(long = "to")]
        grantee: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                password,
            } => {
                commands::users::create(&email, &name, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Categories => {
                commands::seed::categories().await?;
            }
        },
        Commands::Share { action } => match action {
            ShareAction::Grant { grantor, grantee } => {
                commands::share::grant(&grantor, &grantee).await?;
            }
        },
    }
    Ok(())
}
