//! Sorting the collection by a numeric field.

use crate::collection::Collection;
use crate::error::{PatientError, PatientResult};
use crate::record::Patient;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Numeric field a collection can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Height, SortField::Weight, SortField::Bmi];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::Bmi => "bmi",
        }
    }

    /// Sort key for `patient`. BMI is the value derived at validation, never a stored one.
    ///
    /// A non-finite key sorts as 0. Validation rejects non-finite heights, weights and BMIs, so
    /// records that come through [`Collection`] never take this path.
    fn key(self, patient: &Patient) -> f64 {
        let value = match self {
            SortField::Height => patient.height(),
            SortField::Weight => patient.weight(),
            SortField::Bmi => patient.bmi(),
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

impl FromStr for SortField {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                PatientError::InvalidQuery(format!(
                    "invalid sort field '{s}', select from {}",
                    quoted_list(SortField::ALL.iter().map(|f| f.as_str()))
                ))
            })
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| {
                PatientError::InvalidQuery(format!(
                    "invalid order '{s}', select from {}",
                    quoted_list(SortOrder::ALL.iter().map(|o| o.as_str()))
                ))
            })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses raw query parameters. A missing order defaults to ascending; a missing field is invalid.
///
/// # Errors
///
/// Returns [`PatientError::InvalidQuery`] naming the accepted values.
pub fn parse_sort_params(
    sort_by: Option<&str>,
    order: Option<&str>,
) -> PatientResult<(SortField, SortOrder)> {
    let field = sort_by.unwrap_or_default().parse::<SortField>()?;
    let order = match order {
        Some(order) => order.parse::<SortOrder>()?,
        None => SortOrder::default(),
    };
    Ok((field, order))
}

/// Returns every patient ordered by `field`.
///
/// The sort is stable in both directions: patients with equal keys keep their collection order.
pub fn sort(collection: &Collection, field: SortField, order: SortOrder) -> Vec<Patient> {
    let mut patients: Vec<Patient> = collection.iter().cloned().collect();
    patients.sort_by(|a, b| {
        let ordering: Ordering = field.key(a).total_cmp(&field.key(b));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    patients
}

fn quoted_list<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = values.map(|v| format!("'{v}'")).collect();
    format!("[{}]", quoted.join(", "))
}
