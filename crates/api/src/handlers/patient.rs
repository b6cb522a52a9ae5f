//! Handlers for the `/patients` resource.
//!
//! Field validation happens here, before the repository is called, so bad
//! input is reported as 400 instead of surfacing as a constraint violation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use wardwatch_core::error::CoreError;
use wardwatch_core::patient::{
    normalize_gender, validate_age, validate_blood_type, validate_email, validate_required,
    PatientCondition,
};
use wardwatch_core::search::{
    clamp_limit, clamp_offset, name_search_pattern, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use wardwatch_core::types::DbId;
use wardwatch_db::models::patient::{CreatePatient, Patient, PatientFilter, UpdatePatient};
use wardwatch_db::repositories::PatientRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::query::PatientListParams;
use crate::state::AppState;

/// POST /api/v1/patients
///
/// The patient code is assigned by the repository; the condition defaults to
/// `Stable` and the blood type to `N/A`.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreatePatient>,
) -> AppResult<(StatusCode, Json<Patient>)> {
    validate_create(&mut input)?;

    let patient = PatientRepo::create(&state.pool, &input).await?;
    tracing::info!(
        patient_id = patient.id,
        patient_code = %patient.patient_code,
        user_id = auth.user_id,
        username = %auth.username,
        "Patient created"
    );
    Ok((StatusCode::CREATED, Json(patient)))
}

/// GET /api/v1/patients
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PatientListParams>,
) -> AppResult<Json<Vec<Patient>>> {
    let condition = params
        .condition
        .as_deref()
        .map(str::parse::<PatientCondition>)
        .transpose()?;

    let filter = PatientFilter {
        search: name_search_pattern(params.search.as_deref()),
        condition: condition.map(|c| c.as_str().to_string()),
        limit: clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        offset: clamp_offset(params.offset),
    };

    let patients = PatientRepo::list(&state.pool, &filter).await?;
    tracing::debug!(count = patients.len(), "Listed patients");
    Ok(Json(patients))
}

/// GET /api/v1/patients/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Patient>> {
    let patient = PatientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Patient",
            id,
        }))?;
    Ok(Json(patient))
}

/// PUT /api/v1/patients/{id}
///
/// Partial update: omitted fields keep their stored values.
pub async fn update(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(mut input): AppJson<UpdatePatient>,
) -> AppResult<Json<Patient>> {
    validate_update(&mut input)?;

    let patient = PatientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Patient",
            id,
        }))?;
    Ok(Json(patient))
}

/// DELETE /api/v1/patients/{id}
///
/// Removes the patient and every measurement recorded against it.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    match PatientRepo::delete(&state.pool, id).await? {
        Some(measurements_removed) => {
            tracing::info!(
                patient_id = id,
                measurements_removed,
                user_id = auth.user_id,
                username = %auth.username,
                "Patient deleted"
            );
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Patient",
            id,
        })),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_create(input: &mut CreatePatient) -> Result<(), CoreError> {
    validate_required(&input.name, "name")?;
    validate_required(&input.phone, "phone")?;
    validate_age(input.age)?;
    input.gender = normalize_gender(&input.gender)?;
    validate_optional_fields(
        input.condition.as_deref(),
        input.blood_type.as_deref(),
        input.email.as_deref(),
    )
}

fn validate_update(input: &mut UpdatePatient) -> Result<(), CoreError> {
    if let Some(name) = &input.name {
        validate_required(name, "name")?;
    }
    if let Some(phone) = &input.phone {
        validate_required(phone, "phone")?;
    }
    if let Some(age) = input.age {
        validate_age(age)?;
    }
    if let Some(gender) = &input.gender {
        input.gender = Some(normalize_gender(gender)?);
    }
    validate_optional_fields(
        input.condition.as_deref(),
        input.blood_type.as_deref(),
        // An empty email clears the column.
        input.email.as_deref().filter(|email| !email.is_empty()),
    )
}

fn validate_optional_fields(
    condition: Option<&str>,
    blood_type: Option<&str>,
    email: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(condition) = condition {
        condition.parse::<PatientCondition>()?;
    }
    if let Some(blood_type) = blood_type {
        validate_blood_type(blood_type)?;
    }
    if let Some(email) = email {
        validate_email(email)?;
    }
    Ok(())
}
