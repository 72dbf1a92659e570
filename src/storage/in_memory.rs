//! In-memory implementation of [`DocumentStore`] for testing and development

use crate::core::error::StorageError;
use crate::storage::DocumentStore;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory document store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryStore<T> {
    document: Arc<RwLock<T>>,
}

impl<T: Default> InMemoryStore<T> {
    /// Create a store holding the default (empty) document
    pub fn new() -> Self {
        Self {
            document: Arc::new(RwLock::new(T::default())),
        }
    }
}

impl<T> InMemoryStore<T> {
    /// Create a store pre-seeded with a document
    pub fn with_document(document: T) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
        }
    }
}

#[async_trait]
impl<T> DocumentStore<T> for InMemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<T, StorageError> {
        let document = self.document.read().map_err(|e| StorageError::Unavailable {
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(document.clone())
    }

    async fn save(&self, document: &T) -> Result<(), StorageError> {
        let mut slot = self.document.write().map_err(|e| StorageError::Unavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        *slot = document.clone();

        Ok(())
    }
}

/// Store whose saves always fail, for error-path tests
#[cfg(test)]
pub struct SaveFailingStore<T> {
    inner: InMemoryStore<T>,
}

#[cfg(test)]
impl<T: Default> SaveFailingStore<T> {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl<T> DocumentStore<T> for SaveFailingStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<T, StorageError> {
        self.inner.load().await
    }

    async fn save(&self, _document: &T) -> Result<(), StorageError> {
        Err(StorageError::Io {
            path: "test".to_string(),
            message: "injected save failure".to_string(),
        })
    }
}
