//! Fierce CLI - Storefront and admin client from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in with a token issued by the backend
//! fierce login --token "$TOKEN"
//! fierce login --admin --token "$ADMIN_TOKEN"
//!
//! # Where would a path land for the current session?
//! fierce navigate /admin-dashboard
//!
//! # Storefront product list
//! fierce catalog
//!
//! # Admin dashboard
//! fierce dashboard
//! fierce products add --name Widget --price 9.99 --stock 5 --image https://cdn.example.com/w.png
//! fierce orders approve 42
//!
//! fierce logout
//! ```
//!
//! # Environment Variables
//!
//! - `FIERCE_API_URL` - Backend base URL (default `http://127.0.0.1:5000/api/v1`)
//! - `FIERCE_SESSION_FILE` - Where the session is persisted
//! - `FIERCE_TOKEN` - Token for `login` when `--token` is not given
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - Optional error reporting

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use fierce_client::ClientConfig;
use fierce_core::OrderId;
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "fierce")]
#[command(author, version, about = "Fierce storefront and admin client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a session token
    Login {
        /// Token issued by the backend login endpoint
        #[arg(short, long, env = "FIERCE_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Mark the session as an admin session
        #[arg(long)]
        admin: bool,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored session and reachable routes
    Whoami,
    /// Resolve a route path for the stored session
    Navigate {
        /// Path such as `/admin-dashboard`
        path: String,
    },
    /// List every route and where it lands for the stored session
    Routes,
    /// List products as the storefront shows them
    Catalog,
    /// Show the admin dashboard
    Dashboard,
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a product through the dashboard form
    Add {
        #[arg(short, long)]
        name: String,

        /// Unit price, e.g. `9.99`
        #[arg(short, long)]
        price: String,

        #[arg(short, long)]
        stock: String,

        /// Image URL
        #[arg(short, long)]
        image: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Approve a pending order
    Approve {
        /// Order ID
        id: OrderId,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = ClientConfig::from_env();

    // Sentry must be initialized before the subscriber
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fierce_cli=info,fierce_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { token, admin } => {
            commands::session::login(config, token.map(SecretString::from), admin)?;
        }
        Commands::Logout => {
            commands::session::logout(config)?;
        }
        Commands::Whoami => commands::session::whoami(config)?,
        Commands::Navigate { path } => {
            commands::navigate::navigate(config, &path)?;
        }
        Commands::Routes => commands::navigate::routes(config)?,
        Commands::Catalog => commands::catalog::list(config).await?,
        Commands::Dashboard => commands::admin::show(config).await?,
        Commands::Products { action } => match action {
            ProductAction::Add {
                name,
                price,
                stock,
                image,
            } => {
                let input = commands::admin::ProductInput {
                    name,
                    price,
                    stock,
                    image,
                };
                commands::admin::add_product(config, input).await?;
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::Approve { id } => commands::admin::approve_order(config, id).await?,
        },
    }
    Ok(())
}
