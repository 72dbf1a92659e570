//! Storage backends for file-backed documents
//!
//! Each store owns one whole document (the order collection, the sales
//! ledger, the weekly history) and exposes only two primitives: `load` the
//! full document and `save` a full replacement. Services never see the
//! backing medium; they get an injected `Arc<dyn DocumentStore<T>>`.

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;

use crate::core::error::StorageError;
use async_trait::async_trait;

/// Whole-document persistence seam
///
/// `load` must produce the document exactly as last saved (or the default
/// document if nothing was ever saved), and `save` must be all-or-nothing:
/// a failed save leaves the previously persisted document intact.
#[async_trait]
pub trait DocumentStore<T>: Send + Sync {
    /// Load the full persisted document
    async fn load(&self) -> Result<T, StorageError>;

    /// Replace the persisted document with `document`
    async fn save(&self, document: &T) -> Result<(), StorageError>;
}
