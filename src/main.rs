/// Account Service
///
/// Registration, password login and token-protected profile lookup over HTTP,
/// backed by a SQLite account table.

mod account;
mod api;
mod auth;
mod config;
mod context;
mod db;
mod error;
mod server;

use config::ServerConfig;
use context::AppContext;
use error::AccountResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> AccountResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("account_service={0},tower_http={0}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Account service v{}", env!("CARGO_PKG_VERSION"));

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}
