use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::{Document, Storage, StorageError};

/// In-process storage.
///
/// Clones share the same underlying map, so several stores can be handed
/// their own `MemoryStorage` and still see each other's documents, and a test
/// can keep a clone around to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    documents: Rc<RefCell<HashMap<Document, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw contents of a document, if written.
    pub fn get(&self, document: Document) -> Option<String> {
        self.documents.borrow().get(&document).cloned()
    }

    /// Number of documents written so far.
    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, document: Document) -> Result<Option<String>, StorageError> {
        Ok(self.get(document))
    }

    fn save(&mut self, document: Document, contents: &str) -> Result<(), StorageError> {
        self.documents
            .borrow_mut()
            .insert(document, contents.to_string());
        Ok(())
    }
}
