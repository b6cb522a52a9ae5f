//! Handlers for the `/clinical` resource.
//!
//! `POST /clinical` drives the ingestion pipeline: the measurement is stored
//! first, then evaluated, and an abnormal reading escalates the patient to
//! `Critical`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use wardwatch_core::error::CoreError;
use wardwatch_core::ingestion::{Escalation, IngestError, IngestionPipeline, NewMeasurement};
use wardwatch_core::measurement::format_value;
use wardwatch_core::types::DbId;
use wardwatch_db::ingestion::{PgConditionUpdater, PgMeasurementStore};
use wardwatch_db::models::measurement::Measurement;
use wardwatch_db::repositories::MeasurementRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /clinical`.
///
/// Missing fields deserialize to empty values so the pipeline can reject them
/// with a validation error. Clients also send a `dateTime` key; like any other
/// unknown key it is ignored, and the server assigns the timestamp.
#[derive(Debug, Deserialize)]
pub struct CreateMeasurementRequest {
    pub patient_id: Option<DbId>,
    #[serde(rename = "type", default)]
    pub measurement_type: String,
    #[serde(default)]
    pub value: String,
}

/// POST /api/v1/clinical
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateMeasurementRequest>,
) -> AppResult<(StatusCode, Json<Measurement>)> {
    let patient_id = input.patient_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation("patient_id is required".to_string()))
    })?;
    let measurement = NewMeasurement {
        patient_id,
        measurement_type: input.measurement_type,
        value: input.value,
    };

    let store = PgMeasurementStore::new(&state.pool);
    let updater = PgConditionUpdater::new(&state.pool);
    let pipeline = IngestionPipeline::new(&store, &updater, &state.config.thresholds);

    let ingested = pipeline
        .ingest(&measurement)
        .await
        .map_err(ingest_error_to_app)?;

    let reading = ingested
        .reading
        .as_ref()
        .map(format_value)
        .unwrap_or_default();
    match &ingested.escalation {
        Escalation::Escalated => tracing::info!(
            measurement_id = ingested.record.id,
            patient_id,
            reading = %reading,
            recorded_by = %auth.username,
            "Abnormal reading escalated patient"
        ),
        Escalation::NotRequired => tracing::debug!(
            measurement_id = ingested.record.id,
            patient_id,
            reading = %reading,
            "Reading within normal band"
        ),
        Escalation::Skipped(reason) => tracing::warn!(
            measurement_id = ingested.record.id,
            patient_id,
            measurement_type = %ingested.record.measurement_type,
            reason = ?reason,
            "Measurement stored without evaluation"
        ),
    }

    Ok((StatusCode::CREATED, Json(ingested.record)))
}

/// GET /api/v1/clinical/{patient_id}
///
/// Newest first. A patient with no measurements (or an unknown id) yields `[]`.
pub async fn list_by_patient(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(patient_id): Path<DbId>,
) -> AppResult<Json<Vec<Measurement>>> {
    let measurements = MeasurementRepo::list_by_patient(&state.pool, patient_id).await?;
    tracing::debug!(patient_id, count = measurements.len(), "Listed measurements");
    Ok(Json(measurements))
}

fn ingest_error_to_app(err: IngestError<Measurement, sqlx::Error>) -> AppError {
    match err {
        IngestError::Invalid(core) => AppError::Core(core),
        IngestError::Storage(db) => AppError::Database(db),
        IngestError::PatientNotFound { patient_id, record } => {
            tracing::warn!(
                measurement_id = record.id,
                patient_id,
                "Abnormal reading for unknown patient; measurement kept"
            );
            AppError::Core(CoreError::NotFound {
                entity: "Patient",
                id: patient_id,
            })
        }
    }
}
