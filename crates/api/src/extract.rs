//! Request body extractor that reports bad JSON through [`AppError`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use wardwatch_core::error::CoreError;

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`] in request position.
///
/// Syntax errors, wrongly typed fields, and a missing `Content-Type` are
/// rejected as `400 VALIDATION_ERROR` with the usual `{"message","code"}`
/// body instead of axum's plain-text rejection.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::Core(CoreError::Validation(rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}
