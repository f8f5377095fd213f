//! Error handling for the REST API server.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use tracing::error;
use verso_core::{ErrorCode, VersoError};

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// A required query parameter was absent or blank.
    pub fn missing_param(name: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::ValMissingField.as_str(),
            format!("{} parameter is required", name),
        )
        .with_details(json!({ "field": name }))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from verso-core errors
impl From<VersoError> for ApiError {
    fn from(err: VersoError) -> Self {
        let code = err.code().as_str();

        match err {
            VersoError::Validation { message, field, .. } => {
                let api = ApiError::new(StatusCode::BAD_REQUEST, code, message);
                match field {
                    Some(field) => api.with_details(json!({ "field": field })),
                    None => api,
                }
            }
            VersoError::NotFound {
                message, user_id, ..
            } => {
                let api = ApiError::new(StatusCode::NOT_FOUND, code, message);
                match user_id {
                    Some(id) => api.with_details(json!({ "user_id": id })),
                    None => api,
                }
            }
            VersoError::UnsupportedOperation {
                operation,
                supported,
            } => ApiError::new(
                StatusCode::BAD_REQUEST,
                code,
                format!("Invalid operation. Supported: {}", supported.join(", ")),
            )
            .with_details(json!({ "operation": operation, "supported": supported })),
            other => {
                error!(error = %other, code, "Request failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, code, other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(format!(
            "Invalid query parameters: {}",
            rejection.body_text()
        ))
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
