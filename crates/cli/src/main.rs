//! Pocketshop CLI - users, session and catalog from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Register, then log in (same storage file as the server)
//! pocketshop register -u alice -e alice@example.com -p password1
//! pocketshop login -e alice@example.com -p password1
//!
//! # Who is logged in, and who is registered
//! pocketshop whoami
//! pocketshop users
//!
//! # Browse the catalog
//! pocketshop catalog --search phone --sort low-to-high --page 2
//!
//! pocketshop logout
//! ```
//!
//! # Commands
//!
//! - `register` / `login` / `logout` / `whoami` / `users` - Account commands
//! - `catalog` - Filtered, sorted, paginated product listing
//!
//! Storage and catalog locations come from `STOREFRONT_DATA_PATH` and
//! `CATALOG_URL` (or `.env`) unless overridden with `--data` and
//! `--catalog-url`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;
use commands::catalog::ListArgs;

#[derive(Parser)]
#[command(name = "pocketshop")]
#[command(author, version, about = "Pocketshop CLI tools")]
struct Cli {
    /// Storage file shared with the storefront server
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Product catalog endpoint
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user (does not log in)
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// At least 8 characters
        #[arg(short, long)]
        password: String,
    },
    /// Log in, replacing any current session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List registered users
    Users,
    /// List products
    Catalog(ListArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pocketshop=info,pocketshop_storefront=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).without_time())
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = commands::load_config()?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(url) = cli.catalog_url.as_deref() {
        config.catalog.url = commands::parse_catalog_url(url)?;
    }

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => commands::account::register(&config, &username, &email, &password)?,
        Commands::Login { email, password } => {
            commands::account::login(&config, &email, &password)?;
        }
        Commands::Logout => commands::account::logout(&config)?,
        Commands::Whoami => commands::account::whoami(&config)?,
        Commands::Users => commands::account::users(&config)?,
        Commands::Catalog(args) => commands::catalog::list(&config, &args).await?,
    }
    Ok(())
}
