use tracing::warn;

use super::{Document, Storage, StorageError};

/// A storage that always fails to load and save.
///
/// This storage is useful for testing that stores fall back to defaults and
/// keep working in memory when persistence is broken.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStorage;

impl Storage for FailingStorage {
    fn load(&self, document: Document) -> Result<Option<String>, StorageError> {
        warn!(%document, "FailingStorage intentionally returning error");
        Err(StorageError::Unavailable)
    }

    fn save(&mut self, document: Document, _contents: &str) -> Result<(), StorageError> {
        warn!(%document, "FailingStorage intentionally returning error");
        Err(StorageError::Unavailable)
    }
}
