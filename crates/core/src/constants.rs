//! Constants used throughout the records core crate.

/// Default collection file when no explicit path is configured.
pub const DEFAULT_RECORDS_FILE: &str = "patients.json";

/// Suffix appended to the collection file name while a save is in flight.
pub const TEMP_FILE_SUFFIX: &str = ".tmp";

/// Inclusive bounds for a patient's age in years.
pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 120;

/// BMI classification boundaries.
///
/// `NORMAL_UPPER` and `OVERWEIGHT_LOWER` leave the gap `[24.9, 25.0)`, which classifies as obese.
pub const UNDERWEIGHT_UPPER: f64 = 18.5;
pub const NORMAL_UPPER: f64 = 24.9;
pub const OVERWEIGHT_LOWER: f64 = 25.0;
pub const OVERWEIGHT_UPPER: f64 = 29.9;
