//! Shopfront CLI - Shop and administer a Shopfront store from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the password may also come from SHOPFRONT_PASSWORD)
//! sf-cli login -e asha@example.in
//!
//! # Browse the catalog
//! sf-cli products --category "Skin Care" --sort price_asc
//! sf-cli product 42
//!
//! # Track an order without signing in
//! sf-cli track -o 1017 -e asha@example.in
//!
//! # Admin
//! sf-cli admin stats
//! sf-cli admin set-status 1017 shipped
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPFRONT_API_URL` - Base URL of the API
//! - `SHOPFRONT_CREDENTIALS_PATH` - Session file (default: platform config dir)
//! - `SHOPFRONT_LOG_JSON` - Emit logs as JSON when set
//! - `RUST_LOG` - Log filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use shopfront_client::{ApiClient, ProductQuery};
use shopfront_core::{Email, OrderId, ProductId};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Shopfront command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and save the session
    Login {
        #[arg(short, long)]
        email: Email,

        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: Email,

        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        phone: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List products
    Products {
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Server sort key, e.g. `price_asc`, `price_desc`, `newest`
        #[arg(long)]
        sort: Option<String>,

        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
    /// Show one product
    Product { id: String },
    /// Track an order by ID and email
    Track {
        #[arg(short, long)]
        order: String,

        #[arg(short, long)]
        email: Email,
    },
    /// List your orders
    Orders,
    /// Admin tools
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Dashboard totals
    Stats,
    /// Sales series
    Chart {
        /// Monthly instead of daily
        #[arg(long)]
        monthly: bool,
    },
    /// Every order
    Orders {
        /// Only orders with this delivery status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Change an order's status
    SetStatus {
        id: String,

        /// Delivery status (`pending`, `processing`, `shipped`, `out_for_delivery`, `delivered`, `cancelled`)
        status: String,

        /// Payment status (`pending`, `paid`, `failed`)
        #[arg(long)]
        payment: Option<String>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_cli=info,shopfront_client=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if std::env::var_os("SHOPFRONT_LOG_JSON").is_some() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = commands::connect()?;
    let mut out = std::io::stdout().lock();

    dispatch(&client, cli.command, &mut out).await?;
    out.flush()?;
    Ok(())
}

async fn dispatch(client: &ApiClient, command: Commands, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Commands::Login { email, password } => {
            commands::session::login(client, &email, &SecretString::from(password), out).await?;
        }
        Commands::Register {
            name,
            email,
            password,
            phone,
        } => {
            let password = SecretString::from(password);
            commands::session::register(client, &name, &email, &password, phone.as_deref(), out)
                .await?;
        }
        Commands::Logout => commands::session::logout(client, out)?,
        Commands::Whoami => commands::session::whoami(client, out).await?,
        Commands::Products {
            search,
            category,
            sort,
            featured,
        } => {
            let query = ProductQuery {
                search,
                category,
                sort,
                featured,
            };
            commands::shop::products(client, &query, out).await?;
        }
        Commands::Product { id } => {
            commands::shop::product(client, &ProductId::new(id), out).await?;
        }
        Commands::Track { order, email } => {
            commands::shop::track(client, &OrderId::new(order), &email, out).await?;
        }
        Commands::Orders => commands::shop::orders(client, out).await?,
        Commands::Admin { action } => match action {
            AdminAction::Stats => commands::admin::stats(client, out).await?,
            AdminAction::Chart { monthly } => commands::admin::chart(client, monthly, out).await?,
            AdminAction::Orders { status } => {
                commands::admin::orders(client, status.as_deref(), out).await?;
            }
            AdminAction::SetStatus {
                id,
                status,
                payment,
            } => {
                commands::admin::set_status(
                    client,
                    &OrderId::new(id),
                    &status,
                    payment.as_deref(),
                    out,
                )
                .await?;
            }
        },
    }
    Ok(())
}
