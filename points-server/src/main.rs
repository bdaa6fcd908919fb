//! Points server
//!
//! Quotes deposits in points, builds the wallet transactions that make them,
//! and reports their settlement status.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, get_database_url};
use points_core::config::ConfigStore;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Points quote and deposit settlement server
#[derive(Parser, Debug)]
#[command(name = "points-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "POINTS_CONFIG", default_value = "./points-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting points-server v{}", env!("CARGO_PKG_VERSION"));

    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader
        .load()
        .inspect_err(|e| tracing::error!("Failed to load configuration: {}", e))?;

    let listen_addr = loaded_config.listen;
    tracing::info!(
        chains = loaded_config.registry.chains.len(),
        assets = loaded_config.registry.assets.len(),
        nfts = loaded_config.registry.nfts.len(),
        "Configuration loaded from {:?}",
        args.config
    );

    let database_url = get_database_url().inspect_err(|e| tracing::error!("{}", e))?;

    let db_pool = connect_database(&database_url, args.migrate).await?;

    let registry = ConfigStore::new(loaded_config.registry);
    let state = AppState::new(db_pool.clone(), registry.clone(), &loaded_config.price_feed);

    // Listens for SIGHUP
    let shutdown_notify = spawn_config_reload_handler(registry, config_loader, listen_addr);

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    shutdown_notify.notify_one();

    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Open the ledger pool, applying migrations first when asked to.
async fn connect_database(database_url: &str, migrate: bool) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .inspect_err(|e| tracing::error!("Failed to connect to ledger database: {}", e))?;
    tracing::info!("Ledger database connected");

    if migrate {
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .inspect_err(|e| tracing::error!("Failed to run migrations: {}", e))?;
        tracing::info!("Ledger migrations applied");
    }
    Ok(db_pool)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
