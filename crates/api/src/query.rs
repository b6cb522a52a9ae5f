//! Query parameter types for list endpoints.

use serde::Deserialize;

/// Query parameters for `GET /patients` (`?search=&condition=&limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PatientListParams {
    /// Case-insensitive substring match on the patient name.
    pub search: Option<String>,
    /// Exact condition label (`Stable` or `Critical`).
    pub condition: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
