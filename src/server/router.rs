//! Route table for the HTTP adapter

use crate::server::handlers::{
    AppState, accept_order, create_order, dashboard, list_orders, list_replies, mark_notified,
    record_sale, remove_customer, save_weekly_history,
};
use axum::Router;
use axum::routing::{delete, get, post};
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the application router
///
/// Routes keep the original paths the dashboard and clients call:
/// - POST `/api/pedido` - submit an order
/// - GET `/api/pedidos` - list all orders
/// - GET `/api/respostas` - accepted orders not yet delivered to the client
/// - POST `/api/responder` - operator accepts an order
/// - POST `/api/marcarNotificado` - acknowledge delivery to the client
/// - GET `/api/dados`, POST `/api/venda`, DELETE `/api/dados/{numero}` - sales ledger
/// - POST `/api/salvarHistoricoSemanal` - weekly history log
///
/// Anything else falls through to static assets under `static_dir`.
pub fn build_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/pedido", post(create_order))
        .route("/api/pedidos", get(list_orders))
        .route("/api/respostas", get(list_replies))
        .route("/api/responder", post(accept_order))
        .route("/api/marcarNotificado", post(mark_notified))
        .route("/api/dados", get(dashboard))
        .route("/api/dados/{numero}", delete(remove_customer))
        .route("/api/venda", post(record_sale))
        .route("/api/salvarHistoricoSemanal", post(save_weekly_history))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
