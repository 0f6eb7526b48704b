//! REST API types.
//!
//! Field names are snake_case on the wire (`converted_csv`, `detail`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;

/// Body returned by every converter endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertResponse {
    pub converted_csv: String,
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub time: DateTime<Local>,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "CSV Converter is healthy.".to_string(),
            time: Local::now(),
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Create an error response body
pub fn error_response(detail: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        detail: detail.into(),
    }
}

impl ServerError {
    /// 400 for problems with the caller's payload, 404 for unknown routes,
    /// 500 for everything else.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Conversion(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ServerError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(error_response(self.to_string()))).into_response()
    }
}
