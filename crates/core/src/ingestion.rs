//! Clinical measurement ingestion pipeline.
//!
//! A new measurement moves through these stages:
//!
//! ```text
//! Received -> Persisted -> Evaluated -> Escalated | Skipped -> Done
//! ```
//!
//! The measurement is always written before it is evaluated. Escalation is a
//! separate write with no transaction tying it to the first one: when the
//! referenced patient does not exist the measurement stays stored and the
//! caller receives [`IngestError::PatientNotFound`] carrying the saved record.
//!
//! Storage is reached through [`MeasurementStore`] and [`ConditionUpdater`],
//! so the pipeline runs unchanged against Postgres or in-memory fakes.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::measurement::{parse_reading, MeasurementType, ParseError, Reading};
use crate::patient::validate_required;
use crate::thresholds::ThresholdTable;
use crate::types::DbId;

/// A measurement as submitted, before it has been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeasurement {
    pub patient_id: DbId,
    pub measurement_type: String,
    pub value: String,
}

impl NewMeasurement {
    /// Check that every required field is present.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.patient_id <= 0 {
            return Err(CoreError::Validation(format!(
                "patient_id must be a positive id, got {}",
                self.patient_id
            )));
        }
        validate_required(&self.measurement_type, "type")?;
        validate_required(&self.value, "value")?;
        Ok(())
    }
}

/// Append-only measurement persistence.
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// The stored row, including its server-assigned id and timestamp.
    type Record: Send;
    type Error: Send;

    async fn save(&self, measurement: &NewMeasurement) -> Result<Self::Record, Self::Error>;
}

/// Writes the escalated condition onto a patient.
#[async_trait]
pub trait ConditionUpdater: Send + Sync {
    type Error: Send;

    /// Set the patient's condition to `Critical`, whatever it was before.
    ///
    /// Returns `false` when no patient has the given id.
    async fn escalate_to_critical(&self, patient_id: DbId) -> Result<bool, Self::Error>;
}

/// Why a stored measurement was not evaluated against the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unevaluated {
    /// No rule exists for the submitted type label.
    UnknownType,
    /// The value text could not be decoded.
    Malformed(ParseError),
}

/// Result of checking a measurement value against the threshold table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assessment {
    Normal(Reading),
    Abnormal(Reading),
    Unevaluated(Unevaluated),
}

impl Assessment {
    pub fn reading(&self) -> Option<Reading> {
        match self {
            Assessment::Normal(reading) | Assessment::Abnormal(reading) => Some(*reading),
            Assessment::Unevaluated(_) => None,
        }
    }
}

/// Decode and evaluate a measurement value. Never fails: anything that cannot
/// be evaluated is reported as [`Assessment::Unevaluated`].
pub fn assess(thresholds: &ThresholdTable, measurement_type: &str, value: &str) -> Assessment {
    let Some(kind) = MeasurementType::from_label(measurement_type.trim()) else {
        return Assessment::Unevaluated(Unevaluated::UnknownType);
    };

    match parse_reading(kind, value) {
        Ok(reading) if thresholds.is_abnormal(&reading) => Assessment::Abnormal(reading),
        Ok(reading) => Assessment::Normal(reading),
        Err(err) => Assessment::Unevaluated(Unevaluated::Malformed(err)),
    }
}

/// What happened to the patient's condition after the measurement was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escalation {
    /// The reading was abnormal and the patient is now `Critical`.
    Escalated,
    /// The reading was inside its band; the patient was not touched.
    NotRequired,
    /// The reading could not be evaluated; the patient was not touched.
    Skipped(Unevaluated),
}

/// A successfully ingested measurement.
#[derive(Debug)]
pub struct Ingested<R> {
    pub record: R,
    pub reading: Option<Reading>,
    pub escalation: Escalation,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError<R, E> {
    /// Required fields were missing or malformed; nothing was stored.
    #[error(transparent)]
    Invalid(CoreError),

    /// A store write failed. When the failure is in the escalation step the
    /// measurement has already been stored.
    #[error("storage failure: {0}")]
    Storage(E),

    /// The reading was abnormal but the patient does not exist. The
    /// measurement remains stored.
    #[error("Patient with id {patient_id} not found")]
    PatientNotFound { patient_id: DbId, record: R },
}

/// Drives a single measurement through store, evaluation, and escalation.
pub struct IngestionPipeline<'a, S, U> {
    store: &'a S,
    updater: &'a U,
    thresholds: &'a ThresholdTable,
}

impl<'a, S, U> IngestionPipeline<'a, S, U>
where
    S: MeasurementStore,
    U: ConditionUpdater<Error = S::Error>,
{
    pub fn new(store: &'a S, updater: &'a U, thresholds: &'a ThresholdTable) -> Self {
        Self {
            store,
            updater,
            thresholds,
        }
    }

    pub async fn ingest(
        &self,
        input: &NewMeasurement,
    ) -> Result<Ingested<S::Record>, IngestError<S::Record, S::Error>> {
        input.validate().map_err(IngestError::Invalid)?;

        let record = self.store.save(input).await.map_err(IngestError::Storage)?;

        let assessment = assess(self.thresholds, &input.measurement_type, &input.value);
        let reading = assessment.reading();

        let escalation = match assessment {
            Assessment::Abnormal(_) => {
                let found = self
                    .updater
                    .escalate_to_critical(input.patient_id)
                    .await
                    .map_err(IngestError::Storage)?;
                if !found {
                    return Err(IngestError::PatientNotFound {
                        patient_id: input.patient_id,
                        record,
                    });
                }
                Escalation::Escalated
            }
            Assessment::Normal(_) => Escalation::NotRequired,
            Assessment::Unevaluated(reason) => Escalation::Skipped(reason),
        };

        Ok(Ingested {
            record,
            reading,
            escalation,
        })
    }
}
