//! Patient service.
//!
//! Orchestrates the record model, storage adapter and sort engine for each operation. Every call
//! loads the collection fresh from the store; mutating calls write it back in full before
//! returning. Nothing is cached between calls.

use crate::collection::Collection;
use crate::config::CoreConfig;
use crate::error::{PatientError, PatientResult};
use crate::query::{parse_sort_params, sort};
use crate::record::{merge_partial, validate_full, Patient, PatientDraft, PatientPatch};
use crate::storage::{CollectionStore, JsonFileStore};
use std::sync::Arc;

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn CollectionStore>,
}

impl PatientService {
    /// Creates a service over an arbitrary store.
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self { store }
    }

    /// Creates a service backed by the JSON file named in `cfg`.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(Arc::new(JsonFileStore::new(cfg.records_file())))
    }

    /// Returns the whole collection in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Storage`] if the collection cannot be loaded.
    pub fn list(&self) -> PatientResult<Collection> {
        Ok(self.store.load()?)
    }

    /// Looks up a single patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no patient has that id, or
    /// [`PatientError::Storage`] if the collection cannot be loaded.
    pub fn get(&self, id: &str) -> PatientResult<Patient> {
        let collection = self.store.load()?;
        collection
            .get(id)
            .cloned()
            .ok_or_else(|| PatientError::NotFound(id.to_owned()))
    }

    /// Returns every patient ordered by `sort_by` (`height`, `weight` or `bmi`).
    ///
    /// `order` is `asc` or `desc` and defaults to `asc`. Parameters are checked before storage is
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidQuery`] for an unknown field or order, or
    /// [`PatientError::Storage`] if the collection cannot be loaded.
    pub fn sort(&self, sort_by: Option<&str>, order: Option<&str>) -> PatientResult<Vec<Patient>> {
        let (field, order) = parse_sort_params(sort_by, order)?;
        let collection = self.store.load()?;
        Ok(sort(&collection, field, order))
    }

    /// Validates and stores a new patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError`] if:
    /// - a patient with the same id already exists ([`PatientError::Conflict`]),
    /// - any field is missing or invalid ([`PatientError::Validation`]),
    /// - the collection cannot be loaded or saved ([`PatientError::Storage`]).
    ///
    /// Storage is left untouched on every error except a failed save.
    pub fn create(&self, id: &str, fields: PatientDraft) -> PatientResult<Patient> {
        let mut collection = self.store.load()?;
        if collection.contains(id.trim()) {
            return Err(PatientError::Conflict(id.trim().to_owned()));
        }

        let patient = validate_full(id, fields)?;
        collection.insert(patient.clone())?;
        self.store.save(&collection)?;

        tracing::info!("created patient {}", patient.id());
        Ok(patient)
    }

    /// Applies a partial update to an existing patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError`] if:
    /// - no patient has that id ([`PatientError::NotFound`]),
    /// - the merged record is invalid ([`PatientError::Validation`]),
    /// - the collection cannot be loaded or saved ([`PatientError::Storage`]).
    pub fn update(&self, id: &str, patch: PatientPatch) -> PatientResult<Patient> {
        let mut collection = self.store.load()?;
        let existing = collection
            .get(id)
            .ok_or_else(|| PatientError::NotFound(id.to_owned()))?;

        let updated = merge_partial(existing, patch)?;
        collection.replace(updated.clone())?;
        self.store.save(&collection)?;

        tracing::info!("updated patient {}", updated.id());
        Ok(updated)
    }
}
