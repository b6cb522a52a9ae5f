//! Patient entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wardwatch_core::types::{DbId, Timestamp};

/// A row from the `patients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Patient {
    pub id: DbId,
    /// Sequential human-readable code, e.g. `PA001`.
    pub patient_code: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub admission_date: Timestamp,
    /// `Stable` or `Critical`.
    pub condition: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    /// Defaults to `N/A`.
    pub blood_type: String,
    pub photo_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new patient. The patient code is assigned by the repo.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatient {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub admission_date: Timestamp,
    /// Defaults to `Stable` if omitted.
    pub condition: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    /// Defaults to `N/A` if omitted.
    pub blood_type: Option<String>,
    pub photo_url: Option<String>,
}

/// DTO for updating an existing patient. All fields are optional.
///
/// `None` leaves a column unchanged. `Some("")` clears the nullable text
/// columns (`email`, `address`, `emergency_contact_phone`, `medical_history`,
/// `allergies`, `photo_url`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePatient {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub admission_date: Option<Timestamp>,
    pub condition: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub blood_type: Option<String>,
    pub photo_url: Option<String>,
}

/// Filters for listing patients. `search` is an `ILIKE` pattern, already
/// escaped by the caller.
#[derive(Debug, Clone)]
pub struct PatientFilter {
    pub search: Option<String>,
    pub condition: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
