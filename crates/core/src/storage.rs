//! Whole-collection persistence.
//!
//! A [`CollectionStore`] reads and writes the entire [`Collection`] as one unit. There is no
//! locking or versioning: two concurrent `save` calls race and the last one to finish wins.
//!
//! [`JsonFileStore`] is the production backend. [`MemoryStore`] keeps the same JSON text in
//! memory and is intended for tests and embedding.

use crate::collection::Collection;
use crate::constants::TEMP_FILE_SUFFIX;
use crate::error::{StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Load/save interface over a persisted collection.
pub trait CollectionStore: Send + Sync {
    /// Reads and validates the full collection.
    fn load(&self) -> StorageResult<Collection>;

    /// Overwrites the persisted collection with `collection`.
    fn save(&self, collection: &Collection) -> StorageResult<()>;
}

/// Collection stored as a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty collection file if none exists yet.
    ///
    /// Returns `true` if a file was created.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the parent directory or the file cannot be created.
    pub fn initialise(&self) -> StorageResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StorageError::Write)?;
        }
        self.save(&Collection::new())?;
        tracing::info!("created empty collection at {}", self.path.display());
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(TEMP_FILE_SUFFIX);
        self.path.with_file_name(name)
    }
}

impl CollectionStore for JsonFileStore {
    fn load(&self) -> StorageResult<Collection> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::Missing {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(StorageError::Read(e)),
        };
        let collection = Collection::from_json(&text)?;
        tracing::debug!(
            "loaded {} patients from {}",
            collection.len(),
            self.path.display()
        );
        Ok(collection)
    }

    /// Writes to a sibling temporary file and renames it over the target, so a failed write never
    /// leaves a truncated collection behind.
    fn save(&self, collection: &Collection) -> StorageResult<()> {
        let json = collection.to_json()?;
        let tmp_path = self.temp_path();

        if let Err(e) = fs::write(&tmp_path, json) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::Write(e));
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::Write(e));
        }

        tracing::debug!(
            "saved {} patients to {}",
            collection.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Collection held in memory as JSON text, with the same load/save semantics as the file store.
///
/// A store created with [`MemoryStore::missing`] behaves like an absent file until first saved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    text: Mutex<Option<String>>,
}

impl MemoryStore {
    /// A store holding an empty collection.
    pub fn new() -> Self {
        Self::with_json("{}")
    }

    /// A store that has never been written.
    pub fn missing() -> Self {
        Self::default()
    }

    /// A store seeded with raw collection JSON. The text is validated on first load.
    pub fn with_json(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(Some(text.into())),
        }
    }

    /// The current raw contents, if any.
    pub fn snapshot(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.text.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CollectionStore for MemoryStore {
    fn load(&self) -> StorageResult<Collection> {
        match self.lock().as_deref() {
            Some(text) => Collection::from_json(text),
            None => Err(StorageError::Missing {
                path: PathBuf::from("<memory>"),
            }),
        }
    }

    fn save(&self, collection: &Collection) -> StorageResult<()> {
        let json = collection.to_json()?;
        *self.lock() = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{validate_full, PatientDraft};
    use tempfile::TempDir;

    fn sample_patient(id: &str, height: f64) -> crate::Patient {
        validate_full(
            id,
            PatientDraft {
                name: Some(format!("Patient {id}")),
                city: Some("Delhi".into()),
                age: Some(40),
                gender: Some("other".into()),
                height: Some(height),
                weight: Some(70.0),
            },
        )
        .expect("valid sample patient")
    }

    #[test]
    fn load_of_missing_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("patients.json"));

        assert!(matches!(store.load(), Err(StorageError::Missing { .. })));
    }

    #[test]
    fn load_of_malformed_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StorageError::Malformed(_))));
    }

    #[test]
    fn save_then_load_preserves_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("patients.json"));

        let mut collection = Collection::new();
        collection.insert(sample_patient("P003", 1.6)).unwrap();
        collection.insert(sample_patient("P001", 1.8)).unwrap();
        collection.insert(sample_patient("P002", 1.7)).unwrap();
        store.save(&collection).expect("save should succeed");

        let loaded = store.load().expect("load should succeed");
        assert_eq!(loaded, collection);
        let ids: Vec<&str> = loaded.iter().map(|p| p.id()).collect();
        assert_eq!(ids, ["P003", "P001", "P002"]);
    }

    #[test]
    fn save_leaves_no_temporary_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("patients.json"));
        store.save(&Collection::new()).unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["patients.json"]);
    }

    #[test]
    fn save_into_missing_directory_fails_without_touching_anything() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("absent").join("patients.json"));

        assert!(matches!(
            store.save(&Collection::new()),
            Err(StorageError::Write(_))
        ));
        assert!(!temp_dir.path().join("absent").exists());
    }

    #[test]
    fn initialise_creates_empty_collection_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("data").join("patients.json"));

        assert!(store.initialise().unwrap());
        assert!(store.load().unwrap().is_empty());

        let mut collection = Collection::new();
        collection.insert(sample_patient("P001", 1.8)).unwrap();
        store.save(&collection).unwrap();

        assert!(!store.initialise().unwrap());
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn memory_store_behaves_like_file_store() {
        let store = MemoryStore::missing();
        assert!(matches!(store.load(), Err(StorageError::Missing { .. })));

        let mut collection = Collection::new();
        collection.insert(sample_patient("P001", 1.8)).unwrap();
        store.save(&collection).unwrap();

        assert_eq!(store.load().unwrap(), collection);
        assert!(store.snapshot().unwrap().contains("\"P001\""));

        let corrupt = MemoryStore::with_json("{\"P001\": 5}");
        assert!(matches!(corrupt.load(), Err(StorageError::Malformed(_))));
    }
}
