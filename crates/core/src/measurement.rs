//! Clinical measurement kinds and the textual value parser.
//!
//! Measurement values arrive as free text with a unit suffix (`"120/80 mmHg"`,
//! `"72 bpm"`). [`parse_reading`] turns that text into a typed [`Reading`]
//! that the threshold rules can evaluate.

use serde::{Deserialize, Serialize};

/// The measurement kinds the rule set knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementType {
    #[serde(rename = "Blood Pressure")]
    BloodPressure,
    #[serde(rename = "Respiratory Rate")]
    RespiratoryRate,
    #[serde(rename = "HeartBeat Rate")]
    HeartBeatRate,
    #[serde(rename = "Blood Oxygen Level")]
    BloodOxygenLevel,
}

/// All recognized measurement kinds, in display order.
pub const ALL_MEASUREMENT_TYPES: &[MeasurementType] = &[
    MeasurementType::BloodPressure,
    MeasurementType::RespiratoryRate,
    MeasurementType::HeartBeatRate,
    MeasurementType::BloodOxygenLevel,
];

impl MeasurementType {
    /// Wire label, exactly as the mobile client sends it.
    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementType::BloodPressure => "Blood Pressure",
            MeasurementType::RespiratoryRate => "Respiratory Rate",
            MeasurementType::HeartBeatRate => "HeartBeat Rate",
            MeasurementType::BloodOxygenLevel => "Blood Oxygen Level",
        }
    }

    /// Resolve a wire label. Matching is exact; unknown labels return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        ALL_MEASUREMENT_TYPES
            .iter()
            .copied()
            .find(|kind| kind.as_str() == label)
    }

    /// Unit suffix appended to values of this kind.
    pub fn unit(self) -> &'static str {
        match self {
            MeasurementType::BloodPressure => "mmHg",
            MeasurementType::RespiratoryRate => "breaths/min",
            MeasurementType::HeartBeatRate => "bpm",
            MeasurementType::BloodOxygenLevel => "%",
        }
    }
}

/// A measurement value decoded into its numeric components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    BloodPressure { systolic: i32, diastolic: i32 },
    RespiratoryRate(i32),
    HeartBeatRate(i32),
    BloodOxygenLevel(i32),
}

impl Reading {
    /// The measurement kind this reading belongs to.
    pub fn kind(&self) -> MeasurementType {
        match self {
            Reading::BloodPressure { .. } => MeasurementType::BloodPressure,
            Reading::RespiratoryRate(_) => MeasurementType::RespiratoryRate,
            Reading::HeartBeatRate(_) => MeasurementType::HeartBeatRate,
            Reading::BloodOxygenLevel(_) => MeasurementType::BloodOxygenLevel,
        }
    }
}

/// Why a textual value could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("blood pressure value has no '/' separator")]
    MissingSeparator,

    #[error("value is empty")]
    MissingValue,

    #[error("'{segment}' is not a valid integer")]
    InvalidNumber { segment: String },
}

/// Decode `value` according to the format used by `kind`.
///
/// - Blood Pressure: `"<systolic>/<diastolic> <unit>"`. The diastolic part
///   ends at the first space; the unit is discarded.
/// - Rates: `"<number> <unit>"`. The number ends at the first space.
pub fn parse_reading(kind: MeasurementType, value: &str) -> Result<Reading, ParseError> {
    match kind {
        MeasurementType::BloodPressure => {
            let (systolic, rest) = value.split_once('/').ok_or(ParseError::MissingSeparator)?;
            let diastolic = leading_token(rest).ok_or(ParseError::MissingValue)?;
            Ok(Reading::BloodPressure {
                systolic: parse_int(systolic.trim())?,
                diastolic: parse_int(diastolic)?,
            })
        }
        MeasurementType::RespiratoryRate => Ok(Reading::RespiratoryRate(parse_rate(value)?)),
        MeasurementType::HeartBeatRate => Ok(Reading::HeartBeatRate(parse_rate(value)?)),
        MeasurementType::BloodOxygenLevel => Ok(Reading::BloodOxygenLevel(parse_rate(value)?)),
    }
}

/// Render a reading in the canonical `"<number(s)> <unit>"` form.
pub fn format_value(reading: &Reading) -> String {
    let unit = reading.kind().unit();
    match reading {
        Reading::BloodPressure {
            systolic,
            diastolic,
        } => format!("{systolic}/{diastolic} {unit}"),
        Reading::RespiratoryRate(rate)
        | Reading::HeartBeatRate(rate)
        | Reading::BloodOxygenLevel(rate) => format!("{rate} {unit}"),
    }
}

fn parse_rate(value: &str) -> Result<i32, ParseError> {
    let number = leading_token(value).ok_or(ParseError::MissingValue)?;
    parse_int(number)
}

/// First whitespace-delimited token, ignoring leading whitespace.
fn leading_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

fn parse_int(segment: &str) -> Result<i32, ParseError> {
    if segment.is_empty() {
        return Err(ParseError::MissingValue);
    }
    segment.parse::<i32>().map_err(|_| ParseError::InvalidNumber {
        segment: segment.to_string(),
    })
}
