use super::{Document, Storage, StorageError};

/// A no-op storage that discards every write.
///
/// Useful when you need a store but don't care about persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStorage;

impl Storage for NullStorage {
    fn load(&self, _document: Document) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn save(&mut self, _document: Document, _contents: &str) -> Result<(), StorageError> {
        Ok(())
    }
}
