//! Response envelope and HTTP error mapping
//!
//! Every endpoint answers `{ "data": ..., "error": ... }`: on success
//! `error` is null, on failure `data` is null and `error` carries the
//! domain error text.

use crate::contract::MaintenanceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{ data, error }` response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error response: status code plus enveloped message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::<()>::failed(self.message);
        (self.status, Json(body)).into_response()
    }
}

impl From<MaintenanceError> for ApiError {
    fn from(error: MaintenanceError) -> Self {
        map_domain_error(error)
    }
}

/// Map domain errors to HTTP status codes
pub fn map_domain_error(error: MaintenanceError) -> ApiError {
    let status = match &error {
        MaintenanceError::NotFound { .. } => StatusCode::NOT_FOUND,
        MaintenanceError::Conflict { .. } => StatusCode::CONFLICT,
        MaintenanceError::Validation { .. } => StatusCode::BAD_REQUEST,
        MaintenanceError::Inactive { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MaintenanceError::Export { .. } | MaintenanceError::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    ApiError::new(status, error.to_string())
}

/// Successful handler result
pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Wrap `data` in a successful envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope::ok(data)))
}
