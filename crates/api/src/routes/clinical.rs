use axum::routing::{get, post};
use axum::Router;

use crate::handlers::clinical;
use crate::state::AppState;

/// Routes mounted at `/clinical`.
///
/// ```text
/// POST /                 -> create
/// GET  /{patient_id}     -> list_by_patient
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(clinical::create))
        .route("/{patient_id}", get(clinical::list_by_patient))
}
