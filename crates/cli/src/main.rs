//! Bella CLI - Shop the cosmetics storefront from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog and add two units of a product
//! bella products
//! bella add 7 --quantity 2
//!
//! # Adjust quantities
//! bella increase p1
//! bella decrease p1
//!
//! # Show the cart, or its stored JSON form
//! bella show
//! bella show --json
//!
//! # Place the order and get the WhatsApp handoff link
//! bella checkout --email ana@example.com
//!
//! # Seller: review and close orders
//! bella orders list --status pendiente --customer ana
//! bella orders show 118
//! bella orders complete 118
//! bella orders cancel 119
//! ```
//!
//! The cart survives between invocations: it is stored under
//! `CART_STORAGE_DIR` (default `.bella`). Commands that reach the backend
//! need `BACKEND_URL` and `BACKEND_API_KEY`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bella_core::OrderStatus;
use bella_storefront::config::StorefrontConfig;
use bella_storefront::error::AppError;
use bella_storefront::orders::{DEFAULT_ORDER_LIMIT, OrderFilter, Resolution};
use bella_storefront::state::Session;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "bella")]
#[command(author, version, about = "Bella storefront cart, checkout and orders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products on sale
    Products,
    /// Add a catalog product to the cart
    Add {
        /// Catalog product id
        id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Add one unit of a product already in the cart
    Increase {
        /// Product id
        id: String,
    },
    /// Remove one unit of a product, keeping at least one
    Decrease {
        /// Product id
        id: String,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Show the cart
    Show {
        /// Print the stored JSON document instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Place the order and hand off to the seller on WhatsApp
    Checkout {
        /// Email of the signed-in customer
        #[arg(short, long)]
        email: String,
    },
    /// Manage customer orders (seller)
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },
}

#[derive(Subcommand)]
enum OrdersCommand {
    /// List recent orders, newest first
    List {
        /// Only orders in this status: pendiente, completado, anulado
        #[arg(short, long)]
        status: Option<OrderStatus>,

        /// Only customers whose name contains this text
        #[arg(short, long)]
        customer: Option<String>,

        /// Most orders to show
        #[arg(short, long, default_value_t = DEFAULT_ORDER_LIMIT)]
        limit: usize,
    },
    /// Show the items of an order
    Show {
        /// Order id
        id: String,
    },
    /// Mark an order as completed
    Complete {
        /// Order id
        id: String,
    },
    /// Mark an order as cancelled
    Cancel {
        /// Order id
        id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
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

    Some(guard)
}

/// Filter tracing events to Sentry event types.
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

    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Logs go to stderr so command output stays clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bella_storefront=info,bella_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        e.report();
        output::error(&e);
        let code = e.exit_code();
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(code);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let mut session = Session::open(config);

    match cli.command {
        Commands::Products => commands::catalog::products().await?,
        Commands::Add { id, quantity } => commands::catalog::add(&mut session, id, quantity).await?,
        Commands::Increase { id } => commands::cart::increase(&mut session, id),
        Commands::Decrease { id } => commands::cart::decrease(&mut session, id),
        Commands::Remove { id } => commands::cart::remove(&mut session, id),
        Commands::Clear => commands::cart::clear(&mut session),
        Commands::Show { json } => commands::cart::show(&session, json)?,
        Commands::Checkout { email } => commands::checkout::run(&mut session, &email).await?,
        Commands::Orders { command } => match command {
            OrdersCommand::List {
                status,
                customer,
                limit,
            } => {
                let filter = OrderFilter {
                    status,
                    customer,
                    limit,
                };
                commands::orders::list(&filter).await?;
            }
            OrdersCommand::Show { id } => commands::orders::show(id).await?,
            OrdersCommand::Complete { id } => {
                commands::orders::resolve(id, Resolution::Complete).await?;
            }
            OrdersCommand::Cancel { id } => {
                commands::orders::resolve(id, Resolution::Cancel).await?;
            }
        },
    }
    Ok(())
}
