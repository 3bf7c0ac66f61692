//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::DEFAULT_RECORDS_FILE;
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    records_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidConfig`] if `records_file` is empty.
    pub fn new(records_file: PathBuf) -> PatientResult<Self> {
        if records_file.as_os_str().is_empty() {
            return Err(PatientError::InvalidConfig(
                "records file path cannot be empty".into(),
            ));
        }

        Ok(Self { records_file })
    }

    /// Path of the JSON file holding the patient collection.
    pub fn records_file(&self) -> &Path {
        &self.records_file
    }
}

/// Resolve the collection file path from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_RECORDS_FILE`].
pub fn records_file_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_FILE))
}
