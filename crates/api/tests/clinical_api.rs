//! HTTP-level integration tests for measurement ingestion and history.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{
    auth_token, body_json, build_test_app, build_test_app_with, create_patient, get_auth,
    post_json, post_json_auth, test_config,
};
use sqlx::PgPool;
use wardwatch_core::thresholds::Band;
use wardwatch_db::repositories::{MeasurementRepo, PatientRepo};

async fn record(pool: &PgPool, body: serde_json::Value) -> axum::response::Response {
    post_json_auth(build_test_app(pool.clone()), "/api/v1/clinical", body, &auth_token()).await
}

async fn condition_of(pool: &PgPool, id: i64) -> String {
    PatientRepo::find_by_id(pool, id)
        .await
        .unwrap()
        .expect("patient should exist")
        .condition
}

// ---------------------------------------------------------------------------
// Escalation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn abnormal_heart_rate_escalates_patient(pool: PgPool) {
    let patient = create_patient(&pool, "Tachy Cardia").await;
    let id = patient["id"].as_i64().unwrap();

    let body = serde_json::json!({ "patient_id": id, "type": "HeartBeat Rate", "value": "110 bpm" });
    let response = record(&pool, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["patient_id"], id);
    assert_eq!(json["type"], "HeartBeat Rate");
    assert_eq!(json["value"], "110 bpm");
    assert!(json["id"].is_i64());
    assert!(json["date_time"].is_string());

    assert_eq!(condition_of(&pool, id).await, "Critical");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn abnormal_blood_pressure_escalates_patient(pool: PgPool) {
    let patient = create_patient(&pool, "Hyper Tension").await;
    let id = patient["id"].as_i64().unwrap();

    let body = serde_json::json!({ "patient_id": id, "type": "Blood Pressure", "value": "185/90 mmHg" });
    assert_eq!(record(&pool, body).await.status(), StatusCode::CREATED);
    assert_eq!(condition_of(&pool, id).await, "Critical");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn boundary_readings_leave_patient_stable(pool: PgPool) {
    let patient = create_patient(&pool, "Border Line").await;
    let id = patient["id"].as_i64().unwrap();

    for (kind, value) in [
        ("Blood Pressure", "180/120 mmHg"),
        ("Respiratory Rate", "12 breaths/min"),
        ("HeartBeat Rate", "100 bpm"),
        ("Blood Oxygen Level", "90 %"),
    ] {
        let body = serde_json::json!({ "patient_id": id, "type": kind, "value": value });
        assert_eq!(record(&pool, body).await.status(), StatusCode::CREATED);
    }

    assert_eq!(condition_of(&pool, id).await, "Stable");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn critical_patient_stays_critical_after_normal_reading(pool: PgPool) {
    let patient = create_patient(&pool, "No Deescalation").await;
    let id = patient["id"].as_i64().unwrap();

    let body = serde_json::json!({ "patient_id": id, "type": "Blood Oxygen Level", "value": "85 %" });
    record(&pool, body).await;
    let body = serde_json::json!({ "patient_id": id, "type": "Blood Oxygen Level", "value": "98 %" });
    record(&pool, body).await;

    assert_eq!(condition_of(&pool, id).await, "Critical");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn configured_thresholds_are_applied(pool: PgPool) {
    let patient = create_patient(&pool, "Athlete").await;
    let id = patient["id"].as_i64().unwrap();

    let mut config = test_config();
    config.thresholds.heart_beat_rate = "40..120".parse::<Band>().unwrap();
    let app = build_test_app_with(pool.clone(), config);

    let body = serde_json::json!({ "patient_id": id, "type": "HeartBeat Rate", "value": "45 bpm" });
    let response = post_json_auth(app, "/api/v1/clinical", body, &auth_token()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(condition_of(&pool, id).await, "Stable");
}

// ---------------------------------------------------------------------------
// Unevaluated readings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_and_unknown_values_are_stored_without_escalation(pool: PgPool) {
    let patient = create_patient(&pool, "Odd Values").await;
    let id = patient["id"].as_i64().unwrap();

    for (kind, value) in [
        ("Blood Pressure", "high mmHg"),
        ("HeartBeat Rate", "fast"),
        ("Temperature", "41 C"),
    ] {
        let body = serde_json::json!({ "patient_id": id, "type": kind, "value": value });
        assert_eq!(record(&pool, body).await.status(), StatusCode::CREATED);
    }

    assert_eq!(condition_of(&pool, id).await, "Stable");
    assert_eq!(MeasurementRepo::list_by_patient(&pool, id).await.unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_fields_are_bad_request(pool: PgPool) {
    let bodies = [
        serde_json::json!({ "type": "HeartBeat Rate", "value": "70 bpm" }),
        serde_json::json!({ "patient_id": 1, "value": "70 bpm" }),
        serde_json::json!({ "patient_id": 1, "type": "HeartBeat Rate", "value": "  " }),
    ];
    for body in bodies {
        let response = record(&pool, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    assert!(MeasurementRepo::list_by_patient(&pool, 1).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mistyped_json_is_validation_error(pool: PgPool) {
    let bodies = [
        serde_json::json!({ "patient_id": "7", "type": "HeartBeat Rate", "value": "70 bpm" }),
        serde_json::json!({ "patient_id": 7, "type": "HeartBeat Rate", "value": 110 }),
    ];
    for body in bodies {
        let response = record(&pool, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["message"].is_string());
    }

    assert!(MeasurementRepo::list_by_patient(&pool, 7).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn abnormal_reading_for_unknown_patient_is_404_but_kept(pool: PgPool) {
    let body = serde_json::json!({ "patient_id": 8080, "type": "HeartBeat Rate", "value": "150 bpm" });
    let response = record(&pool, body).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Patient with id 8080 not found");

    let response = get_auth(build_test_app(pool), "/api/v1/clinical/8080", &auth_token()).await;
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["value"], "150 bpm");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn normal_reading_for_unknown_patient_is_created(pool: PgPool) {
    let body = serde_json::json!({ "patient_id": 8081, "type": "HeartBeat Rate", "value": "70 bpm" });
    assert_eq!(record(&pool, body).await.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn recording_requires_token(pool: PgPool) {
    let body = serde_json::json!({ "patient_id": 1, "type": "HeartBeat Rate", "value": "70 bpm" });
    let response = post_json(build_test_app(pool), "/api/v1/clinical", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn history_is_empty_array_for_new_patient(pool: PgPool) {
    let patient = create_patient(&pool, "Fresh Admit").await;
    let id = patient["id"].as_i64().unwrap();

    let response = get_auth(build_test_app(pool), &format!("/api/v1/clinical/{id}"), &auth_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn client_timestamp_is_ignored_and_history_is_newest_first(pool: PgPool) {
    let patient = create_patient(&pool, "Time Keeper").await;
    let id = patient["id"].as_i64().unwrap();
    let before = Utc::now() - chrono::Duration::seconds(5);

    let body = serde_json::json!({
        "patient_id": id,
        "type": "Respiratory Rate",
        "value": "16 breaths/min",
        "dateTime": "1999-01-01T00:00:00Z",
    });
    let first = body_json(record(&pool, body).await).await;
    let body = serde_json::json!({ "patient_id": id, "type": "Respiratory Rate", "value": "18 breaths/min" });
    let second = body_json(record(&pool, body).await).await;

    let stamped: DateTime<Utc> = first["date_time"].as_str().unwrap().parse().unwrap();
    assert!(stamped >= before, "server must assign the timestamp");

    let response = get_auth(build_test_app(pool), &format!("/api/v1/clinical/{id}"), &auth_token()).await;
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[0]["id"], second["id"]);
    assert_eq!(history[1]["id"], first["id"]);
}
