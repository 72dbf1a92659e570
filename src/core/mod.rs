//! Core domain types and business logic

pub mod error;
pub mod ledger;
pub mod order;
pub mod service;

pub use error::{ApiError, NotFoundError, StorageError, ValidationError};
pub use ledger::{Customer, LedgerDocument, LedgerService, Sale, WeeklyEntry};
pub use order::{Order, OrderStatus};
pub use service::OrderService;
