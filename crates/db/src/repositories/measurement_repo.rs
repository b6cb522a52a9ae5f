//! Repository for the `clinical_measurements` table.

use sqlx::{PgConnection, PgPool};
use wardwatch_core::ingestion::NewMeasurement;
use wardwatch_core::types::DbId;

use crate::models::measurement::Measurement;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, patient_id, measurement_type, value, date_time";

/// Append-only access to clinical measurements.
pub struct MeasurementRepo;

impl MeasurementRepo {
    /// Insert a measurement, returning the stored row.
    ///
    /// `date_time` is always taken from the database clock.
    pub async fn create(
        pool: &PgPool,
        input: &NewMeasurement,
    ) -> Result<Measurement, sqlx::Error> {
        let query = format!(
            "INSERT INTO clinical_measurements (patient_id, measurement_type, value)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(input.patient_id)
            .bind(input.measurement_type.trim())
            .bind(&input.value)
            .fetch_one(pool)
            .await
    }

    /// List a patient's measurements, newest first.
    pub async fn list_by_patient(
        pool: &PgPool,
        patient_id: DbId,
    ) -> Result<Vec<Measurement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clinical_measurements
             WHERE patient_id = $1
             ORDER BY date_time DESC, id DESC"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(patient_id)
            .fetch_all(pool)
            .await
    }

    /// Remove every measurement for a patient. Returns the number of rows removed.
    ///
    /// Takes a connection so the caller can run it inside the patient-delete
    /// transaction.
    pub async fn delete_for_patient(
        conn: &mut PgConnection,
        patient_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clinical_measurements WHERE patient_id = $1")
            .bind(patient_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
