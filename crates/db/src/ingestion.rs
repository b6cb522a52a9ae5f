//! Postgres-backed implementations of the core ingestion traits.

use async_trait::async_trait;
use sqlx::PgPool;
use wardwatch_core::ingestion::{ConditionUpdater, MeasurementStore, NewMeasurement};
use wardwatch_core::patient::PatientCondition;
use wardwatch_core::types::DbId;

use crate::models::measurement::Measurement;
use crate::repositories::{MeasurementRepo, PatientRepo};

/// Stores measurements in `clinical_measurements`.
pub struct PgMeasurementStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgMeasurementStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> MeasurementStore for PgMeasurementStore<'a> {
    type Record = Measurement;
    type Error = sqlx::Error;

    async fn save(&self, measurement: &NewMeasurement) -> Result<Measurement, sqlx::Error> {
        MeasurementRepo::create(self.pool, measurement).await
    }
}

/// Escalates patients by writing `patients.condition`.
pub struct PgConditionUpdater<'a> {
    pool: &'a PgPool,
}

impl<'a> PgConditionUpdater<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> ConditionUpdater for PgConditionUpdater<'a> {
    type Error = sqlx::Error;

    async fn escalate_to_critical(&self, patient_id: DbId) -> Result<bool, sqlx::Error> {
        let updated =
            PatientRepo::set_condition(self.pool, patient_id, PatientCondition::Critical).await?;
        if updated.is_some() {
            tracing::info!(patient_id, "Patient escalated to Critical");
        }
        Ok(updated.is_some())
    }
}
