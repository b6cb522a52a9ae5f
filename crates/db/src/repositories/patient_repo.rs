//! Repository for the `patients` table.

use sqlx::PgPool;
use wardwatch_core::patient::{next_patient_code, PatientCondition, PATIENT_CODE_PREFIX};
use wardwatch_core::types::DbId;

use crate::models::patient::{CreatePatient, Patient, PatientFilter, UpdatePatient};
use crate::repositories::MeasurementRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, patient_code, name, age, gender, admission_date, condition, phone, \
                       email, address, emergency_contact_phone, medical_history, allergies, \
                       blood_type, photo_url, created_at, updated_at";

/// Provides CRUD operations for patients plus the condition escalation write.
pub struct PatientRepo;

impl PatientRepo {
    /// Insert a new patient, assigning the next sequential patient code.
    ///
    /// The table is locked for the duration of the transaction so two
    /// concurrent creates cannot compute the same code.
    pub async fn create(pool: &PgPool, input: &CreatePatient) -> Result<Patient, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("LOCK TABLE patients IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let max_query = format!(
            "SELECT MAX(SUBSTRING(patient_code FROM {start})::BIGINT) FROM patients
             WHERE patient_code ~ '^{prefix}[0-9]+$'",
            prefix = PATIENT_CODE_PREFIX,
            start = PATIENT_CODE_PREFIX.len() + 1,
        );
        let max_existing: Option<i64> = sqlx::query_scalar(&max_query)
            .fetch_one(&mut *tx)
            .await?;
        let patient_code = next_patient_code(max_existing);

        let query = format!(
            "INSERT INTO patients (patient_code, name, age, gender, admission_date, condition,
                phone, email, address, emergency_contact_phone, medical_history, allergies,
                blood_type, photo_url)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'Stable'), $7, $8, $9, $10, $11, $12,
                COALESCE($13, 'N/A'), $14)
             RETURNING {COLUMNS}"
        );
        let patient = sqlx::query_as::<_, Patient>(&query)
            .bind(&patient_code)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.gender)
            .bind(input.admission_date)
            .bind(&input.condition)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.emergency_contact_phone)
            .bind(&input.medical_history)
            .bind(&input.allergies)
            .bind(&input.blood_type)
            .bind(&input.photo_url)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(patient)
    }

    /// Find a patient by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients WHERE id = $1");
        sqlx::query_as::<_, Patient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List patients in admission order, optionally filtered by name and condition.
    pub async fn list(pool: &PgPool, filter: &PatientFilter) -> Result<Vec<Patient>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM patients
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
               AND ($2::TEXT IS NULL OR condition = $2)
             ORDER BY id ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(&filter.search)
            .bind(&filter.condition)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Update a patient. Only non-`None` fields in `input` are applied.
    ///
    /// For the nullable text columns an empty string clears the value.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePatient,
    ) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!(
            "UPDATE patients SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                admission_date = COALESCE($5, admission_date),
                condition = COALESCE($6, condition),
                phone = COALESCE($7, phone),
                email = CASE WHEN $8 IS NULL THEN email ELSE NULLIF($8, '') END,
                address = CASE WHEN $9 IS NULL THEN address ELSE NULLIF($9, '') END,
                emergency_contact_phone = CASE WHEN $10 IS NULL THEN emergency_contact_phone ELSE NULLIF($10, '') END,
                medical_history = CASE WHEN $11 IS NULL THEN medical_history ELSE NULLIF($11, '') END,
                allergies = CASE WHEN $12 IS NULL THEN allergies ELSE NULLIF($12, '') END,
                blood_type = COALESCE($13, blood_type),
                photo_url = CASE WHEN $14 IS NULL THEN photo_url ELSE NULLIF($14, '') END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.gender)
            .bind(input.admission_date)
            .bind(&input.condition)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.emergency_contact_phone)
            .bind(&input.medical_history)
            .bind(&input.allergies)
            .bind(&input.blood_type)
            .bind(&input.photo_url)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the condition column, regardless of its current value.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_condition(
        pool: &PgPool,
        id: DbId,
        condition: PatientCondition,
    ) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!(
            "UPDATE patients SET condition = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(id)
            .bind(condition.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a patient together with every measurement referencing it.
    ///
    /// Returns the number of measurements removed, or `None` (with nothing
    /// deleted) if the patient does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = MeasurementRepo::delete_for_patient(&mut *tx, id).await?;

        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(removed))
    }
}
