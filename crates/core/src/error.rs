use std::path::PathBuf;

/// A field constraint violated while building a [`crate::Patient`].
///
/// Carries the offending field name and the rule it broke so callers can correct the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {rule}")]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: String,
}

impl ValidationError {
    pub fn new(field: &'static str, rule: impl Into<String>) -> Self {
        Self {
            field,
            rule: rule.into(),
        }
    }

    pub(crate) fn missing(field: &'static str) -> Self {
        Self::new(field, "field required")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("collection file does not exist: {}", path.display())]
    Missing { path: PathBuf },
    #[error("failed to read collection: {0}")]
    Read(std::io::Error),
    #[error("failed to write collection: {0}")]
    Write(std::io::Error),
    #[error("malformed collection: {0}")]
    Malformed(String),
    #[error("failed to serialize collection: {0}")]
    Serialization(serde_json::Error),
    #[error("stored patient {id} is invalid: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: ValidationError,
    },
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid patient: {0}")]
    Validation(#[from] ValidationError),
    #[error("patient not found: {0}")]
    NotFound(String),
    #[error("patient already exists: {0}")]
    Conflict(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
