//! Durable storage for the catalog
//!
//! Every mutation rewrites the whole document. The JSON backend writes to a
//! temporary file next to the target and renames it into place, so a crash
//! mid-write leaves the previous document intact.

use crate::catalog::types::CatalogDocument;
use crate::{LibrarianError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Where a [`CatalogStore`](crate::catalog::CatalogStore) loads from and flushes to
pub trait CatalogBackend {
    /// Read the full document. A missing document is an empty catalog.
    fn load(&self) -> Result<CatalogDocument>;

    /// Replace the stored document
    fn save(&mut self, document: &CatalogDocument) -> Result<()>;

    /// Human readable location, used in logs and errors
    fn describe(&self) -> String;
}

/// Pretty-printed JSON document on the local filesystem
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persistence_error(&self, reason: impl ToString) -> LibrarianError {
        LibrarianError::Persistence {
            target: self.describe(),
            reason: reason.to_string(),
        }
    }

    fn write_atomically(&self, document: &CatalogDocument) -> std::io::Result<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)?;
        serde_json::to_writer_pretty(&mut temp, document)?;
        temp.write_all(b"\n")?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CatalogBackend for JsonFileBackend {
    fn load(&self) -> Result<CatalogDocument> {
        if !self.path.exists() {
            info!("No catalog at {}, starting empty", self.path.display());
            return Ok(CatalogDocument::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let document: CatalogDocument = serde_json::from_str(&content).map_err(|e| {
            LibrarianError::CorruptCatalog(format!("{}: {}", self.path.display(), e))
        })?;
        document.verify()?;

        debug!(
            "Loaded {} books from {}",
            document.books.len(),
            self.path.display()
        );
        Ok(document)
    }

    fn save(&mut self, document: &CatalogDocument) -> Result<()> {
        self.write_atomically(document)
            .map_err(|e| self.persistence_error(e))?;
        debug!(
            "Wrote {} books to {}",
            document.books.len(),
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the last saved document in memory; nothing touches the disk
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    document: CatalogDocument,
    saves: usize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document, as if it had been read from disk
    pub fn with_document(document: CatalogDocument) -> Self {
        Self { document, saves: 0 }
    }

    /// The most recently saved document
    pub fn document(&self) -> &CatalogDocument {
        &self.document
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl CatalogBackend for InMemoryBackend {
    fn load(&self) -> Result<CatalogDocument> {
        self.document.verify()?;
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &CatalogDocument) -> Result<()> {
        self.document = document.clone();
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::Book;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_document() -> CatalogDocument {
        let mut books = BTreeMap::new();
        let book = Book::new("Girls can kiss now", "Jill Gutowitz", "9781982158507")
            .with_tags(["nonfiction", "essays"]);
        books.insert(book.isbn.clone(), book);
        CatalogDocument::new(books)
    }

    #[test]
    fn test_missing_file_is_empty_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(temp_dir.path().join("catalog.json"));

        let document = backend.load().unwrap();
        assert!(document.books.is_empty());
        assert_eq!(document.version, 1);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = JsonFileBackend::new(temp_dir.path().join("catalog.json"));

        let document = sample_document();
        backend.save(&document).unwrap();

        assert_eq!(backend.load().unwrap(), document);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("catalog.json");
        let mut backend = JsonFileBackend::new(&path);

        backend.save(&sample_document()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = JsonFileBackend::new(temp_dir.path().join("catalog.json"));

        backend.save(&sample_document()).unwrap();
        backend.save(&sample_document()).unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_document_shape() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        let mut backend = JsonFileBackend::new(&path);
        backend.save(&sample_document()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["books"]["9781982158507"]["title"], "Girls can kiss now");
        assert_eq!(raw["books"]["9781982158507"]["tags"][1], "essays");
        assert!(raw["books"]["9781982158507"]["ratings"].is_object());
        assert!(raw["books"]["9781982158507"]["completions"].is_array());
    }

    #[test]
    fn test_malformed_file_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileBackend::new(&path).load();
        assert!(matches!(result, Err(LibrarianError::CorruptCatalog(_))));
    }

    #[test]
    fn test_save_into_unwritable_location_is_persistence_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let mut backend = JsonFileBackend::new(blocker.join("catalog.json"));
        let result = backend.save(&sample_document());
        assert!(matches!(result, Err(LibrarianError::Persistence { .. })));
    }

    #[test]
    fn test_in_memory_backend_counts_saves() {
        let mut backend = InMemoryBackend::new();
        assert_eq!(backend.save_count(), 0);

        backend.save(&sample_document()).unwrap();
        assert_eq!(backend.save_count(), 1);
        assert_eq!(backend.document(), &sample_document());
        assert_eq!(backend.load().unwrap(), sample_document());
    }
}
