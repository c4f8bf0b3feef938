//! HTTP error handling and response types.

use aphrodite::{ChartError, ErrorKind};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;
use serde::{Deserialize, Serialize};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable code for programmatic handling
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Failure from the chart engine
    Chart(ChartError),
    /// Request body is not well-formed birth data
    BadRequest(String),
    /// Unknown chart id
    NotFound(String),
    /// Worker task failed
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Chart(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Geometry | ErrorKind::Provider => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::Chart(err) => {
                let code = match err.kind() {
                    ErrorKind::Validation => "VALIDATION_ERROR",
                    ErrorKind::Geometry => "GEOMETRY_ERROR",
                    ErrorKind::Provider => "PROVIDER_ERROR",
                    ErrorKind::Configuration => "CONFIGURATION_ERROR",
                };
                let api = ApiError::new(code, err.to_string());
                match &err {
                    ChartError::Geometry { fault, .. } => api.with_details(fault.to_string()),
                    _ => api,
                }
            }
            AppError::BadRequest(msg) => ApiError::new("VALIDATION_ERROR", msg),
            AppError::NotFound(msg) => ApiError::new("NOT_FOUND", msg),
            AppError::Internal(msg) => ApiError::new("INTERNAL_ERROR", msg),
        };

        warn!("Request failed with {}: {}", status, error.message);
        (status, Json(error)).into_response()
    }
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        AppError::Chart(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Task join error: {}", err))
    }
}
