//! Threshold rule set for clinical readings.
//!
//! Pure logic. The table is a plain value so each deployment can load its own
//! bands from configuration and hand them to the ingestion pipeline.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::measurement::Reading;

/// An inclusive normal range. Either side may be open.
///
/// A value is abnormal only when it falls strictly outside the band, so the
/// bounds themselves are normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub low: Option<i32>,
    pub high: Option<i32>,
}

impl Band {
    /// Band closed on both sides.
    pub const fn between(low: i32, high: i32) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    /// Band with a lower bound only.
    pub const fn at_least(low: i32) -> Self {
        Self {
            low: Some(low),
            high: None,
        }
    }

    /// Whether `value` lies outside the band.
    pub fn is_outside(&self, value: i32) -> bool {
        self.low.is_some_and(|low| value < low) || self.high.is_some_and(|high| value > high)
    }
}

/// Parses `"low..high"`, where either side may be omitted (`"90.."`, `"..100"`).
impl FromStr for Band {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (low, high) = s.trim().split_once("..").ok_or_else(|| {
            CoreError::Validation(format!("Band '{s}' must use the form 'low..high'"))
        })?;

        let low = parse_bound(low, s)?;
        let high = parse_bound(high, s)?;

        if low.is_none() && high.is_none() {
            return Err(CoreError::Validation(format!(
                "Band '{s}' must set at least one bound"
            )));
        }
        if let (Some(l), Some(h)) = (low, high) {
            if l > h {
                return Err(CoreError::Validation(format!(
                    "Band '{s}' has a lower bound above its upper bound"
                )));
            }
        }

        Ok(Self { low, high })
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(low) = self.low {
            write!(f, "{low}")?;
        }
        f.write_str("..")?;
        if let Some(high) = self.high {
            write!(f, "{high}")?;
        }
        Ok(())
    }
}

fn parse_bound(text: &str, whole: &str) -> Result<Option<i32>, CoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i32>().map(Some).map_err(|_| {
        CoreError::Validation(format!("Band '{whole}' has a non-integer bound '{text}'"))
    })
}

/// Normal bands per measurement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdTable {
    pub systolic: Band,
    pub diastolic: Band,
    pub respiratory_rate: Band,
    pub heart_beat_rate: Band,
    pub blood_oxygen_level: Band,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            systolic: Band::between(90, 180),
            diastolic: Band::between(60, 120),
            respiratory_rate: Band::between(12, 20),
            heart_beat_rate: Band::between(60, 100),
            blood_oxygen_level: Band::at_least(90),
        }
    }
}

impl ThresholdTable {
    /// Whether the reading falls outside its clinically safe band.
    pub fn is_abnormal(&self, reading: &Reading) -> bool {
        match *reading {
            Reading::BloodPressure {
                systolic,
                diastolic,
            } => self.systolic.is_outside(systolic) || self.diastolic.is_outside(diastolic),
            Reading::RespiratoryRate(rate) => self.respiratory_rate.is_outside(rate),
            Reading::HeartBeatRate(rate) => self.heart_beat_rate.is_outside(rate),
            Reading::BloodOxygenLevel(rate) => self.blood_oxygen_level.is_outside(rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(systolic: i32, diastolic: i32) -> Reading {
        Reading::BloodPressure {
            systolic,
            diastolic,
        }
    }

    // -- default table --

    #[test]
    fn blood_pressure_inside_band_is_normal() {
        let table = ThresholdTable::default();
        for systolic in [91, 120, 179] {
            for diastolic in [61, 80, 119] {
                assert!(!table.is_abnormal(&bp(systolic, diastolic)));
            }
        }
    }

    #[test]
    fn blood_pressure_boundaries_are_normal() {
        let table = ThresholdTable::default();
        assert!(!table.is_abnormal(&bp(180, 120)));
        assert!(!table.is_abnormal(&bp(90, 60)));
    }

    #[test]
    fn blood_pressure_outside_band_is_abnormal() {
        let table = ThresholdTable::default();
        assert!(table.is_abnormal(&bp(181, 80)));
        assert!(table.is_abnormal(&bp(89, 80)));
        assert!(table.is_abnormal(&bp(120, 121)));
        assert!(table.is_abnormal(&bp(120, 59)));
    }

    #[test]
    fn respiratory_rate_boundaries() {
        let table = ThresholdTable::default();
        assert!(!table.is_abnormal(&Reading::RespiratoryRate(12)));
        assert!(!table.is_abnormal(&Reading::RespiratoryRate(20)));
        assert!(table.is_abnormal(&Reading::RespiratoryRate(11)));
        assert!(table.is_abnormal(&Reading::RespiratoryRate(21)));
    }

    #[test]
    fn heart_beat_rate_boundaries() {
        let table = ThresholdTable::default();
        assert!(!table.is_abnormal(&Reading::HeartBeatRate(60)));
        assert!(!table.is_abnormal(&Reading::HeartBeatRate(100)));
        assert!(table.is_abnormal(&Reading::HeartBeatRate(59)));
        assert!(table.is_abnormal(&Reading::HeartBeatRate(101)));
    }

    #[test]
    fn blood_oxygen_has_no_upper_bound() {
        let table = ThresholdTable::default();
        assert!(!table.is_abnormal(&Reading::BloodOxygenLevel(90)));
        assert!(!table.is_abnormal(&Reading::BloodOxygenLevel(100)));
        assert!(table.is_abnormal(&Reading::BloodOxygenLevel(89)));
    }

    #[test]
    fn custom_table_changes_outcome() {
        let table = ThresholdTable {
            heart_beat_rate: Band::between(50, 120),
            ..ThresholdTable::default()
        };
        assert!(!table.is_abnormal(&Reading::HeartBeatRate(110)));
        assert!(table.is_abnormal(&Reading::HeartBeatRate(121)));
    }

    // -- band parsing --

    #[test]
    fn parses_closed_band() {
        assert_eq!("90..180".parse::<Band>().unwrap(), Band::between(90, 180));
        assert_eq!(" 12 .. 20 ".parse::<Band>().unwrap(), Band::between(12, 20));
    }

    #[test]
    fn parses_open_bands() {
        assert_eq!("90..".parse::<Band>().unwrap(), Band::at_least(90));
        assert_eq!(
            "..100".parse::<Band>().unwrap(),
            Band {
                low: None,
                high: Some(100)
            }
        );
    }

    #[test]
    fn rejects_malformed_bands() {
        assert!("90-180".parse::<Band>().is_err());
        assert!("..".parse::<Band>().is_err());
        assert!("a..10".parse::<Band>().is_err());
        assert!("20..10".parse::<Band>().is_err());
    }

    #[test]
    fn display_matches_parse_syntax() {
        assert_eq!(Band::between(60, 100).to_string(), "60..100");
        assert_eq!(Band::at_least(90).to_string(), "90..");
    }
}
