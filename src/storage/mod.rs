//! Persistence for the trainer's JSON documents.
//!
//! Every store keeps its whole state in memory and rewrites one document
//! through a [`Storage`] after each mutation. Four documents exist, named by
//! [`Document`]. Backends:
//!
//! - [`DirectoryStorage`] writes `<base>/<key>.json` files.
//! - [`MemoryStorage`] keeps documents in a shared in-process map.
//! - [`NullStorage`] discards writes and never has anything to load.
//! - [`FailingStorage`] fails every call, for exercising the fallbacks.
use std::fmt;

use thiserror::Error;

mod directory;
mod failing;
mod memory;
mod null;
mod timestamp;

pub use directory::DirectoryStorage;
pub use failing::FailingStorage;
pub use memory::MemoryStorage;
pub use null::NullStorage;
pub(crate) use timestamp::deserialize_epoch_ms;

/// The independently stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    /// Ordered list of folders with their ranges.
    Folders,
    /// Ordered list of action buttons.
    ActionButtons,
    /// Ordered list of training definitions.
    TrainingDefinitions,
    /// Flat list of session records.
    TrainingStatistics,
}

impl Document {
    pub const ALL: [Document; 4] = [
        Document::Folders,
        Document::ActionButtons,
        Document::TrainingDefinitions,
        Document::TrainingStatistics,
    ];

    /// Stable key the document is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            Document::Folders => "poker-ranges-folders",
            Document::ActionButtons => "poker-ranges-actions",
            Document::TrainingDefinitions => "training-sessions",
            Document::TrainingStatistics => "training-statistics",
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document {document}: {source}")]
    Malformed {
        document: Document,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage is unavailable")]
    Unavailable,
}

/// A place documents are read from at start-up and rewritten to on change.
pub trait Storage {
    /// Raw contents of a document, or `None` if it was never written.
    fn load(&self, document: Document) -> Result<Option<String>, StorageError>;

    /// Replace the contents of a document.
    fn save(&mut self, document: Document, contents: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self, document: Document) -> Result<Option<String>, StorageError> {
        (**self).load(document)
    }

    fn save(&mut self, document: Document, contents: &str) -> Result<(), StorageError> {
        (**self).save(document, contents)
    }
}

/// Load and decode a document.
///
/// Missing, unreadable and malformed documents all come back as `None`
/// after a warning, so callers fall back to their defaults.
pub(crate) fn load_document<S, T>(storage: &S, document: Document) -> Option<T>
where
    S: Storage + ?Sized,
    T: serde::de::DeserializeOwned,
{
    let raw = match storage.load(document) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(%document, "Document not found, using defaults");
            return None;
        }
        Err(error) => {
            tracing::warn!(%document, %error, "Unable to load document, using defaults");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(source) => {
            let error = StorageError::Malformed { document, source };
            tracing::warn!(%error, "Discarding malformed document");
            None
        }
    }
}

/// Encode and write a document. Failures are logged and the caller keeps
/// its in-memory state.
pub(crate) fn save_document<S, T>(storage: &mut S, document: Document, value: &T) -> bool
where
    S: Storage + ?Sized,
    T: serde::Serialize + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|json| storage.save(document, &json));

    match result {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(%document, %error, "Unable to persist document");
            false
        }
    }
}
