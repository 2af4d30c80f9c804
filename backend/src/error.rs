//! Error handling for the dashboard server
//!
//! Every failure is turned into a typed JSON body so the dashboard can show a
//! specific message instead of a generic alert.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::CoreError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Core transform errors
    #[error(transparent)]
    Core(#[from] CoreError),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // Request extraction errors
    #[error("Invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    #[error("Invalid query string: {}", .0.body_text())]
    InvalidQuery(#[from] QueryRejection),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Data source errors
    #[error("Data source unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Data source returned {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("Unexpected data source response: {0}")]
    GatewayResponse(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Core(core) => match core {
                CoreError::InvalidCity(_)
                | CoreError::UnknownModel(_)
                | CoreError::InvalidHorizon { .. } => StatusCode::BAD_REQUEST,
                // demand and series come from the data source
                CoreError::IncompleteDemand { .. } | CoreError::MalformedSeries(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            // 400 for malformed JSON, 415 without a JSON content type, 422 for wrong fields
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::GatewayUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Gateway { .. } | AppError::GatewayResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Core(core) => ErrorDetail {
                code: core.code().to_string(),
                message: core.to_string(),
                field: None,
            },
            AppError::Validation(errors) => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: self.to_string(),
                field: errors.field_errors().keys().next().map(|f| f.to_string()),
            },
            AppError::InvalidBody(_) => ErrorDetail {
                code: "INVALID_BODY".to_string(),
                message: self.to_string(),
                field: None,
            },
            AppError::InvalidQuery(_) => ErrorDetail {
                code: "INVALID_QUERY".to_string(),
                message: self.to_string(),
                field: None,
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: "NOT_FOUND".to_string(),
                message: format!("{} not found", resource),
                field: None,
            },
            AppError::GatewayUnavailable(_) => ErrorDetail {
                code: "DATA_SOURCE_UNAVAILABLE".to_string(),
                message: "The data source is temporarily unavailable".to_string(),
                field: None,
            },
            AppError::Gateway { .. } | AppError::GatewayResponse(_) => ErrorDetail {
                code: "DATA_SOURCE_ERROR".to_string(),
                message: self.to_string(),
                field: None,
            },
            AppError::Internal(_) => ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal server error occurred".to_string(),
                field: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request failed: {}", self);
        }

        (status, Json(ErrorResponse { error: self.detail() })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
