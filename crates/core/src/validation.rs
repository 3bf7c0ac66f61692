//! Field-level validation rules.
//!
//! Each function checks one patient field and returns the canonical value on success. They are
//! shared by full validation and by partial-update merging so both apply identical rules.

use crate::constants::{MAX_AGE, MIN_AGE};
use crate::error::ValidationError;
use crate::record::Gender;

/// Validates a patient id, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns a [`ValidationError`] on the `id` field if the trimmed id is empty.
pub fn validate_id(id: &str) -> Result<String, ValidationError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("id", "must not be empty"));
    }
    Ok(trimmed.to_owned())
}

/// Validates an id read back from storage. Stored ids are used exactly as written.
///
/// # Errors
///
/// Returns a [`ValidationError`] on the `id` field if the id is empty.
pub fn validate_stored_id(id: &str) -> Result<String, ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::new("id", "must not be empty"));
    }
    Ok(id.to_owned())
}

/// Validates a patient name, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns a [`ValidationError`] on the `name` field if the trimmed name is empty.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("name", "must not be empty"));
    }
    Ok(trimmed.to_owned())
}

/// Validates an age in whole years.
///
/// # Errors
///
/// Returns a [`ValidationError`] on the `age` field if `age` is outside `1..=120`.
pub fn validate_age(age: i64) -> Result<u8, ValidationError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::new(
            "age",
            format!("must be between {MIN_AGE} and {MAX_AGE} (got {age})"),
        ));
    }
    u8::try_from(age).map_err(|_| ValidationError::new("age", "out of range"))
}

/// Validates a gender against the closed set of accepted values.
///
/// # Errors
///
/// Returns a [`ValidationError`] on the `gender` field listing the accepted values.
pub fn validate_gender(gender: &str) -> Result<Gender, ValidationError> {
    gender.parse::<Gender>()
}

/// Validates a measurement that must be a finite, strictly positive number.
///
/// # Errors
///
/// Returns a [`ValidationError`] on `field` if `value` is zero, negative, or not finite.
pub fn validate_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::new(
            field,
            format!("must be greater than 0 (got {value})"),
        ));
    }
    Ok(value)
}
