//! Service entrypoint: config, logging, store wiring, serve loop

use anyhow::Result;
use pedidos_api::config::AppConfig;
use pedidos_api::core::{LedgerService, OrderService};
use pedidos_api::server::{AppState, build_router, serve};
use pedidos_api::storage::JsonFileStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    tracing::info!(?config, "configuration loaded");

    let orders = Arc::new(OrderService::new(Arc::new(JsonFileStore::new(
        config.orders_path(),
    ))));
    let ledger = Arc::new(LedgerService::new(
        Arc::new(JsonFileStore::new(config.ledger_path())),
        Arc::new(JsonFileStore::new(config.history_path())),
    ));

    let app = build_router(AppState { orders, ledger }, &config.static_dir);
    serve(app, &config.bind_addr()).await
}
