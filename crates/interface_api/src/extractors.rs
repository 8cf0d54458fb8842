//! Request body and query extraction
//!
//! Handlers take `Result<Json<T>, JsonRejection>` instead of `Json<T>` so
//! malformed input surfaces as an [`ApiError`] JSON body rather than axum's
//! plain-text rejection.

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query},
    Json,
};
use validator::Validate;

use crate::error::ApiError;

/// Unwraps a JSON body
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    result.map(|Json(value)| value).map_err(ApiError::from)
}

/// Unwraps and validates a JSON body
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    let value = extract_json(result)?;
    value.validate()?;
    Ok(value)
}

/// Unwraps query parameters
pub fn extract_query<T>(
    result: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiError> {
    result.map(|Query(value)| value).map_err(ApiError::from)
}
