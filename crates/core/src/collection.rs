//! The patient collection and its on-disk JSON form.
//!
//! The collection is an insertion-ordered mapping from patient id to that patient's stored
//! fields. On disk it is a single JSON object:
//!
//! ```text
//! {
//!   "P001": { "name": "...", "city": "...", "age": 28, "gender": "female", "height": 1.88, "weight": 85.0 },
//!   "P002": { ... }
//! }
//! ```
//!
//! Ids live only in the outer keys. Derived values are never written; unknown keys inside a value
//! are ignored when reading.

use crate::error::{PatientError, PatientResult, StorageError, StorageResult, ValidationError};
use crate::record::{validate_stored, Patient, PatientDraft};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// All patient records, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collection {
    patients: Vec<Patient>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Patient> {
        self.patients.iter()
    }

    /// Appends a new patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Conflict`] if a patient with the same id is already present.
    pub fn insert(&mut self, patient: Patient) -> PatientResult<()> {
        if self.contains(patient.id()) {
            return Err(PatientError::Conflict(patient.id().to_owned()));
        }
        self.patients.push(patient);
        Ok(())
    }

    /// Replaces the patient with the same id, keeping its position, and returns the old record.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no patient has that id.
    pub fn replace(&mut self, patient: Patient) -> PatientResult<Patient> {
        let slot = self
            .patients
            .iter_mut()
            .find(|p| p.id() == patient.id())
            .ok_or_else(|| PatientError::NotFound(patient.id().to_owned()))?;
        Ok(std::mem::replace(slot, patient))
    }

    /// Parses and validates a collection from its JSON text.
    ///
    /// This uses `serde_path_to_error` to report where in the document a structural mismatch was
    /// found (e.g. `P003.age`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if:
    /// - the text is not a JSON object of objects ([`StorageError::Malformed`]),
    /// - any entry fails record validation ([`StorageError::Corrupt`]).
    pub fn from_json(text: &str) -> StorageResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(text);

        let wire = match serde_path_to_error::deserialize::<_, CollectionWire>(&mut deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(StorageError::Malformed(format!(
                    "schema mismatch at {path}: {source}"
                )));
            }
        };
        deserializer
            .end()
            .map_err(|e| StorageError::Malformed(e.to_string()))?;

        let mut patients: Vec<Patient> = Vec::with_capacity(wire.0.len());
        for (id, fields) in wire.0 {
            let patient = match validate_stored(&id, fields) {
                Ok(patient) => patient,
                Err(source) => return Err(StorageError::Corrupt { id, source }),
            };
            if patients.iter().any(|p| p.id() == patient.id()) {
                return Err(StorageError::Corrupt {
                    id,
                    source: ValidationError::new("id", "duplicate key"),
                });
            }
            patients.push(patient);
        }

        Ok(Self { patients })
    }

    /// Renders the collection as pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if serialisation fails.
    pub fn to_json(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(self).map_err(StorageError::Serialization)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Patient;
    type IntoIter = std::slice::Iter<'a, Patient>;

    fn into_iter(self) -> Self::IntoIter {
        self.patients.iter()
    }
}

impl Serialize for Collection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.patients.len()))?;
        for patient in &self.patients {
            map.serialize_entry(patient.id(), &patient.stored_fields())?;
        }
        map.end()
    }
}

/// Ordered id→fields pairs as read from disk, before validation.
struct CollectionWire(Vec<(String, PatientDraft)>);

impl<'de> Deserialize<'de> for CollectionWire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WireVisitor;

        impl<'de> Visitor<'de> for WireVisitor {
            type Value = CollectionWire;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of patient id to patient fields")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, PatientDraft)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, fields)) = map.next_entry::<String, PatientDraft>()? {
                    // A repeated key replaces the earlier value in place.
                    match entries.iter_mut().find(|(existing, _)| *existing == id) {
                        Some(entry) => entry.1 = fields,
                        None => entries.push((id, fields)),
                    }
                }
                Ok(CollectionWire(entries))
            }
        }

        deserializer.deserialize_map(WireVisitor)
    }
}
