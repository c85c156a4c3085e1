//! Spendflow API Server
//!
//! Main entry point for the Spendflow expense approval service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spendflow_api::{AppState, create_router};
use spendflow_shared::AppConfig;
use spendflow_store::ExpenseStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spendflow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Build the in-memory store from seed data
    let store = ExpenseStore::from_config(&config).context("Failed to apply seed data")?;
    info!(
        base_currency = %store.base_currency(),
        actors = store.list_actors().len(),
        rule_sets = store.list_rule_sets().len(),
        "Store ready"
    );

    // Create router
    let app = create_router(AppState::new(store));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
