//! JSON request and response bodies.
//!
//! Request fields are all optional so that a missing field reaches record validation and is
//! reported with its name, instead of failing JSON decoding.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use utoipa::openapi::{ObjectBuilder, Ref, RefOr, Schema};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Plain informational or confirmation message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body returned with every 4xx/5xx response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
}

/// Stored fields of a patient, without id or derived values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientFieldsRes {
    pub name: String,
    pub city: String,
    pub age: u8,
    /// One of `male`, `female`, `other`.
    pub gender: String,
    /// Height in meters.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
}

/// A full patient record including its derived BMI and verdict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: String,
    pub name: String,
    pub city: String,
    pub age: u8,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    /// `weight / height²` rounded to two decimal places.
    pub bmi: f64,
    /// One of `Underweight`, `Normal`, `Overweight`, `Obese`.
    pub verdict: String,
}

/// Mapping of patient id to stored fields, serialized as a JSON object in collection order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListPatientsRes {
    pub patients: Vec<(String, PatientFieldsRes)>,
}

impl Serialize for ListPatientsRes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.patients.len()))?;
        for (id, fields) in &self.patients {
            map.serialize_entry(id, fields)?;
        }
        map.end()
    }
}

// Documented as an object whose values are `PatientFieldsRes`, keyed by patient id.
impl<'s> ToSchema<'s> for ListPatientsRes {
    fn schema() -> (&'s str, RefOr<Schema>) {
        let fields: RefOr<Schema> = RefOr::Ref(Ref::from_schema_name("PatientFieldsRes"));
        (
            "ListPatientsRes",
            ObjectBuilder::new()
                .description(Some("Mapping of patient id to stored fields, in collection order"))
                .additional_properties(Some(fields))
                .into(),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    #[schema(example = "P001")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

/// Partial update: only the fields present in the body are changed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdatePatientReq {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortQuery {
    /// Field to sort by: `height`, `weight` or `bmi`.
    #[param(example = "bmi")]
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    #[param(example = "desc")]
    pub order: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> PatientFieldsRes {
        PatientFieldsRes {
            name: name.into(),
            city: "Kolkata".into(),
            age: 33,
            gender: "other".into(),
            height: 1.7,
            weight: 65.0,
        }
    }

    #[test]
    fn list_schema_maps_ids_to_patient_fields() {
        let (name, schema) = <ListPatientsRes as ToSchema<'_>>::schema();
        assert_eq!(name, "ListPatientsRes");

        let json = serde_json::to_value(schema).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(
            json["additionalProperties"]["$ref"],
            "#/components/schemas/PatientFieldsRes"
        );
    }

    #[test]
    fn list_serializes_as_ordered_object() {
        let res = ListPatientsRes {
            patients: vec![
                ("P002".into(), fields("second")),
                ("P001".into(), fields("first")),
            ],
        };

        let json = serde_json::to_string(&res).unwrap();
        assert!(json.starts_with("{\"P002\":{\"name\":\"second\""), "{json}");
        assert!(json.find("\"P002\"").unwrap() < json.find("\"P001\"").unwrap());
    }

    #[test]
    fn update_request_tolerates_missing_fields() {
        let req: UpdatePatientReq = serde_json::from_str(r#"{"weight": 100.0}"#).unwrap();
        assert_eq!(req.weight, Some(100.0));
        assert_eq!(req.name, None);
    }
}
