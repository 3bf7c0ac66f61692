//! # Records Core
//!
//! Core business logic for the patient records service.
//!
//! This crate contains pure data operations over a single-file patient collection:
//! - Record validation, partial-update merging and derived BMI/verdict values
//! - Whole-collection load/save behind the [`CollectionStore`] trait
//! - Sorting the collection by a numeric field
//!
//! **No API concerns**: HTTP servers and wire types belong in `api-rest` and `api-shared`.

pub mod bmi;
pub mod collection;
pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod query;
pub mod record;
pub mod storage;
pub mod validation;

pub use bmi::Verdict;
pub use collection::Collection;
pub use config::CoreConfig;
pub use constants::DEFAULT_RECORDS_FILE;
pub use error::{
    PatientError, PatientResult, StorageError, StorageResult, ValidationError,
};
pub use patient::PatientService;
pub use query::{SortField, SortOrder};
pub use record::{merge_partial, validate_full, Gender, Patient, PatientDraft, PatientPatch};
pub use storage::{CollectionStore, JsonFileStore, MemoryStore};
