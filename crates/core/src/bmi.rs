//! Body mass index and its classification.
//!
//! Both values are derived from height and weight and are never persisted. They are pure
//! functions of their inputs, so identical measurements always produce identical results.

use crate::constants::{NORMAL_UPPER, OVERWEIGHT_LOWER, OVERWEIGHT_UPPER, UNDERWEIGHT_UPPER};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Computes `weight / height²` rounded to two decimal places.
///
/// Callers are expected to pass validated, strictly positive measurements.
pub fn bmi(height_m: f64, weight_kg: f64) -> f64 {
    round2(weight_kg / (height_m * height_m))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Classification of a BMI value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Verdict {
    /// Classifies a BMI value.
    ///
    /// Values in `[24.9, 25.0)` are neither normal nor overweight and fall through to
    /// [`Verdict::Obese`].
    pub fn classify(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_UPPER {
            Verdict::Underweight
        } else if bmi < NORMAL_UPPER {
            Verdict::Normal
        } else if (OVERWEIGHT_LOWER..OVERWEIGHT_UPPER).contains(&bmi) {
            Verdict::Overweight
        } else {
            Verdict::Obese
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
