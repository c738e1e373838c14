use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::{Document, Storage, StorageError};

/// A storage implementation that keeps each document as a JSON file in a
/// directory.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    base_path: PathBuf,
}

impl DirectoryStorage {
    /// Creates a new `DirectoryStorage` rooted at `base_path`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(base_path: PathBuf) -> Self {
        debug!(?base_path, "Creating DirectoryStorage");
        DirectoryStorage { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn document_path(&self, document: Document) -> PathBuf {
        self.base_path.join(document.key()).with_extension("json")
    }
}

impl Storage for DirectoryStorage {
    #[instrument(level = "trace", skip(self), fields(base_path = ?self.base_path))]
    fn load(&self, document: Document) -> Result<Option<String>, StorageError> {
        let path = self.document_path(document);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the whole document every time.
    ///
    /// The contents go to a temporary sibling first and are then renamed over
    /// the old file.
    #[instrument(level = "trace", skip(self, contents), fields(base_path = ?self.base_path))]
    fn save(&mut self, document: Document, contents: &str) -> Result<(), StorageError> {
        // First make sure the base_path exists at all
        if !self.base_path.exists() {
            debug!(?self.base_path, "Creating storage directory");
            std::fs::create_dir_all(&self.base_path)?;
        }

        let path = self.document_path(document);
        let tmp_path = path.with_extension("json.tmp");
        debug!(?path, bytes = contents.len(), "Writing document");

        std::fs::write(&tmp_path, contents)?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Verifies that save creates the directory tree if it doesn't exist.
    #[test]
    fn test_creates_directory_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_path = temp_dir.path().join("subdir").join("trainer");

        assert!(
            !non_existent_path.exists(),
            "Directory should not exist initially"
        );

        let mut storage = DirectoryStorage::new(non_existent_path.clone());
        storage.save(Document::Folders, "[]").unwrap();

        assert!(non_existent_path.exists());
        let expected_file = non_existent_path.join("poker-ranges-folders.json");
        assert!(expected_file.exists(), "Document file should be created");
    }

    #[test]
    fn test_load_missing_document() {
        let temp_dir = TempDir::new().unwrap();
        let storage = DirectoryStorage::new(temp_dir.path().to_path_buf());
        assert!(storage.load(Document::ActionButtons).unwrap().is_none());
    }

    #[test]
    fn test_overwrites_document() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = DirectoryStorage::new(temp_dir.path().to_path_buf());

        storage.save(Document::TrainingStatistics, "[1]").unwrap();
        storage.save(Document::TrainingStatistics, "[1,2]").unwrap();

        assert_eq!(
            Some("[1,2]".to_string()),
            storage.load(Document::TrainingStatistics).unwrap()
        );
        assert!(
            !temp_dir
                .path()
                .join("training-statistics.json.tmp")
                .exists()
        );
    }

    #[test]
    fn test_documents_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = DirectoryStorage::new(temp_dir.path().to_path_buf());

        storage.save(Document::Folders, "\"folders\"").unwrap();
        storage.save(Document::ActionButtons, "\"buttons\"").unwrap();

        let reopened = DirectoryStorage::new(temp_dir.path().to_path_buf());
        assert_eq!(
            Some("\"folders\"".to_string()),
            reopened.load(Document::Folders).unwrap()
        );
        assert_eq!(
            Some("\"buttons\"".to_string()),
            reopened.load(Document::ActionButtons).unwrap()
        );
    }
}
