pub mod auth;
pub mod clinical;
pub mod health;
pub mod patients;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                      login (public)
/// /auth/reset-password             reset password by email (public)
///
/// /patients                        list, create
/// /patients/{id}                   get, update, delete
///
/// /clinical                        record a measurement
/// /clinical/{patient_id}           measurement history
/// ```
///
/// Everything except `/auth` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/patients", patients::router())
        .nest("/clinical", clinical::router())
}
