//! Patient identity codes, condition states, and field validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Condition
-------------------------------------------------------------------------- */

/// Overall patient condition shown on the ward list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatientCondition {
    #[default]
    Stable,
    Critical,
}

impl PatientCondition {
    /// Label stored in the `patients.condition` column.
    pub fn as_str(self) -> &'static str {
        match self {
            PatientCondition::Stable => "Stable",
            PatientCondition::Critical => "Critical",
        }
    }
}

impl fmt::Display for PatientCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientCondition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Stable" => Ok(PatientCondition::Stable),
            "Critical" => Ok(PatientCondition::Critical),
            other => Err(CoreError::Validation(format!(
                "Unknown condition '{other}'. Valid conditions: Stable, Critical"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
Patient codes
-------------------------------------------------------------------------- */

/// Prefix of every human-readable patient code.
pub const PATIENT_CODE_PREFIX: &str = "PA";

/// Minimum number of digits after the prefix.
const PATIENT_CODE_WIDTH: usize = 3;

/// Render a sequence number as a patient code (`7` -> `"PA007"`).
pub fn format_patient_code(number: i64) -> String {
    format!(
        "{prefix}{number:0width$}",
        prefix = PATIENT_CODE_PREFIX,
        width = PATIENT_CODE_WIDTH
    )
}

/// Extract the sequence number from a patient code (`"PA012"` -> `12`).
pub fn parse_patient_code(code: &str) -> Option<i64> {
    let digits = code.strip_prefix(PATIENT_CODE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Code for the next patient given the highest sequence number in use.
///
/// Numbering starts at 1 when no patients exist.
pub fn next_patient_code(max_existing: Option<i64>) -> String {
    format_patient_code(max_existing.unwrap_or(0) + 1)
}

/* --------------------------------------------------------------------------
Field validation
-------------------------------------------------------------------------- */

/// Blood type recorded when none is supplied.
pub const BLOOD_TYPE_UNKNOWN: &str = "N/A";

/// Accepted blood type labels.
pub const BLOOD_TYPES: &[&str] = &[
    "O+", "O-", "A+", "A-", "B+", "B-", "AB+", "AB-", BLOOD_TYPE_UNKNOWN,
];

/// Accepted gender values (stored lowercase).
pub const GENDERS: &[&str] = &["male", "female", "other"];

const MAX_AGE: i32 = 150;

/// Reject blank required text fields.
pub fn validate_required(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), CoreError> {
    if !(0..=MAX_AGE).contains(&age) {
        return Err(CoreError::Validation(format!(
            "Age must be between 0 and {MAX_AGE}, got {age}"
        )));
    }
    Ok(())
}

/// Lowercase and check a gender value, returning the stored form.
pub fn normalize_gender(gender: &str) -> Result<String, CoreError> {
    let normalized = gender.trim().to_lowercase();
    if GENDERS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(CoreError::Validation(format!(
            "Unknown gender '{gender}'. Valid values: {}",
            GENDERS.join(", ")
        )))
    }
}

pub fn validate_blood_type(blood_type: &str) -> Result<(), CoreError> {
    if BLOOD_TYPES.contains(&blood_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown blood type '{blood_type}'. Valid values: {}",
            BLOOD_TYPES.join(", ")
        )))
    }
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}
