//! # pedidos-api
//!
//! Order-intake and notification-acknowledgement service backed by JSON
//! flat-file stores.
//!
//! ## Architecture
//!
//! - **Store** ([`storage`]): whole-document persistence behind the
//!   [`DocumentStore`](storage::DocumentStore) trait; the production backend
//!   is an atomic-save JSON file, tests use an in-memory store
//! - **Services** ([`core`]): [`OrderService`](core::OrderService) enforces
//!   the order workflow (pendente → aceito, notificado false → true, both
//!   monotonic) with all mutations serialized through one write lock;
//!   [`LedgerService`](core::LedgerService) handles the dashboard's sales
//!   ledger and weekly history
//! - **HTTP adapter** ([`server`]): axum routes mapping the wire contract
//!   onto service calls, plus static asset serving
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use pedidos_api::prelude::*;
//!
//! let store = Arc::new(JsonFileStore::new("data/pedidos.json"));
//! let orders = Arc::new(OrderService::new(store));
//!
//! let order = orders.create_order("2x coffee", "5511999999999").await?;
//! orders.accept_order(order.id).await?;
//! orders.mark_notified(order.id).await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::core::{
        ApiError, Customer, LedgerDocument, LedgerService, NotFoundError, Order, OrderService,
        OrderStatus, Sale, StorageError, ValidationError, WeeklyEntry,
    };
    pub use crate::server::{AppState, build_router, serve};
    pub use crate::storage::{DocumentStore, InMemoryStore, JsonFileStore};

    pub use anyhow::Result;
    pub use std::sync::Arc;
}
