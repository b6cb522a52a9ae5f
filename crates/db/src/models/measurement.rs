//! Clinical measurement model.
//!
//! Measurements are created only through the ingestion pipeline, which takes
//! a [`wardwatch_core::ingestion::NewMeasurement`], so there is no create DTO
//! here and no update DTO at all.

use serde::Serialize;
use sqlx::FromRow;
use wardwatch_core::types::{DbId, Timestamp};

/// A row from the `clinical_measurements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Measurement {
    pub id: DbId,
    /// Non-owning reference to `patients.id`; may dangle.
    pub patient_id: DbId,
    #[serde(rename = "type")]
    pub measurement_type: String,
    pub value: String,
    /// Assigned by the database at insert time.
    pub date_time: Timestamp,
}
