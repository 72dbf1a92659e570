//! JSON flat-file implementation of [`DocumentStore`]
//!
//! The production backend. One pretty-printed UTF-8 JSON file per document,
//! created on first save; a missing file loads as the default document.
//!
//! Saves are atomic: the new contents are written to a temporary sibling
//! file, fsynced, and renamed over the target. A crash mid-save can never
//! leave a truncated or syntactically invalid document behind.

use crate::core::error::StorageError;
use crate::storage::DocumentStore;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// File-backed store for one JSON document of type `T`
pub struct JsonFileStore<T> {
    path: PathBuf,
    _document: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    /// Create a store backed by the given file path.
    ///
    /// Parent directories are created lazily on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _document: PhantomData,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl<T> DocumentStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync + 'static,
{
    async fn load(&self) -> Result<T, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
                path: self.display_path(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(StorageError::Io {
                path: self.display_path(),
                message: e.to_string(),
            }),
        }
    }

    async fn save(&self, document: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|e| StorageError::Encode {
            message: e.to_string(),
        })?;

        let path = self.path.clone();
        let display = self.display_path();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| StorageError::Io {
                path: display,
                message: e.to_string(),
            })?
    }
}

/// Write `bytes` to `path` via a temporary sibling and an atomic rename
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let io_err = |e: std::io::Error| StorageError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
    }

    // The temporary file must live in the same directory for the rename to
    // be atomic.
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = std::fs::File::create(&tmp).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    std::fs::rename(&tmp, path).map_err(io_err)
}
