//! Patient record model.
//!
//! A [`Patient`] can only be obtained through [`validate_full`] or [`merge_partial`], so every
//! instance satisfies the field constraints and carries derived values consistent with its
//! measurements.
//!
//! Raw input arrives as a [`PatientDraft`] (every field optional so a missing field is reported as
//! a validation failure rather than a decode failure) or as a [`PatientPatch`] for partial updates.

use crate::bmi::{bmi, Verdict};
use crate::error::ValidationError;
use crate::validation::{
    validate_age, validate_gender, validate_id, validate_name, validate_positive,
    validate_stored_id,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of accepted gender values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Gender::ALL.iter().map(|g| g.as_str()).collect();
                ValidationError::new(
                    "gender",
                    format!("must be one of {} (got '{s}')", allowed.join(", ")),
                )
            })
    }
}

/// Unvalidated field set for a complete record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PatientDraft {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

/// Partial update: only the fields that are `Some` overwrite the existing record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientPatch {
    pub fn is_empty(&self) -> bool {
        *self == PatientPatch::default()
    }
}

/// A validated patient record with its derived BMI and verdict.
#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    id: String,
    name: String,
    city: String,
    age: u8,
    gender: Gender,
    height: f64,
    weight: f64,
    bmi: f64,
    verdict: Verdict,
}

impl Patient {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Height in meters.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Weight in kilograms.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// The stored (non-derived, non-id) fields of this record.
    pub fn stored_fields(&self) -> StoredFields<'_> {
        StoredFields {
            name: &self.name,
            city: &self.city,
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
        }
    }

    fn to_draft(&self) -> PatientDraft {
        PatientDraft {
            name: Some(self.name.clone()),
            city: Some(self.city.clone()),
            age: Some(i64::from(self.age)),
            gender: Some(self.gender.as_str().to_owned()),
            height: Some(self.height),
            weight: Some(self.weight),
        }
    }
}

/// Borrowed view of the persisted fields of a [`Patient`].
///
/// This is the shape of each value in the collection file and of the list and get views.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StoredFields<'a> {
    pub name: &'a str,
    pub city: &'a str,
    pub age: u8,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
}

/// Validates a complete field set into a [`Patient`] and computes its derived values.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, checking `id` then the fields in declaration
/// order. Missing fields are reported as `field required`.
pub fn validate_full(id: &str, fields: PatientDraft) -> Result<Patient, ValidationError> {
    build(validate_id(id)?, fields)
}

/// Validates a record read back from storage. The id is the outer key exactly as stored.
pub(crate) fn validate_stored(id: &str, fields: PatientDraft) -> Result<Patient, ValidationError> {
    build(validate_stored_id(id)?, fields)
}

fn build(id: String, fields: PatientDraft) -> Result<Patient, ValidationError> {
    let name = validate_name(&required("name", fields.name)?)?;
    let city = required("city", fields.city)?;
    let age = validate_age(required("age", fields.age)?)?;
    let gender = validate_gender(&required("gender", fields.gender)?)?;
    let height = validate_positive("height", required("height", fields.height)?)?;
    let weight = validate_positive("weight", required("weight", fields.weight)?)?;

    let bmi = bmi(height, weight);
    if !bmi.is_finite() {
        return Err(ValidationError::new(
            "height",
            "too small for a finite bmi at this weight",
        ));
    }
    Ok(Patient {
        id,
        name,
        city,
        age,
        gender,
        height,
        weight,
        bmi,
        verdict: Verdict::classify(bmi),
    })
}

/// Applies a partial update to an existing record and re-validates the result in full.
///
/// The id is taken from `existing` and cannot be changed by a patch.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the merged field set breaks any constraint.
pub fn merge_partial(existing: &Patient, patch: PatientPatch) -> Result<Patient, ValidationError> {
    let mut draft = existing.to_draft();

    if let Some(name) = patch.name {
        draft.name = Some(name);
    }
    if let Some(city) = patch.city {
        draft.city = Some(city);
    }
    if let Some(age) = patch.age {
        draft.age = Some(age);
    }
    if let Some(gender) = patch.gender {
        draft.gender = Some(gender);
    }
    if let Some(height) = patch.height {
        draft.height = Some(height);
    }
    if let Some(weight) = patch.weight {
        draft.weight = Some(weight);
    }

    build(existing.id.clone(), draft)
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field))
}
