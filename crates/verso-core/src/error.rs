//! Error types for verso operations.
//!
//! Every failure a store operation can produce maps onto one variant of
//! [`VersoError`]. Each variant carries a stable [`ErrorCode`] so that the
//! HTTP layer and clients can branch on errors without parsing messages.

use thiserror::Error;

/// Result type alias for verso operations.
pub type VersoResult<T> = Result<T, VersoError>;

/// Main error type for all verso operations.
#[derive(Error, Debug)]
pub enum VersoError {
    /// Input validation failed (missing required field, bad range, empty batch).
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        field: Option<String>,
    },

    /// No current record exists for the requested user.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        user_id: Option<String>,
    },

    /// The requested batch or query operation is not recognized.
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation {
        operation: String,
        supported: Vec<&'static str>,
    },

    /// The underlying table failed.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An HTTP request to a verso server could not be completed.
    #[error("Network error: {message}")]
    Network { message: String, code: ErrorCode },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValMissingField,
    ValInvalidRange,
    ValEmptyBatch,
    ValBatchTooLarge,

    // Users (USR_xxx)
    UsrNotFound,

    // Operations (OPS_xxx)
    OpsUnsupported,

    // Storage (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,
    DbCorruptRecord,

    // Network (NET_xxx)
    NetRequestFailed,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValMissingField => "VAL_002",
            ErrorCode::ValInvalidRange => "VAL_003",
            ErrorCode::ValEmptyBatch => "VAL_004",
            ErrorCode::ValBatchTooLarge => "VAL_005",
            ErrorCode::UsrNotFound => "USR_001",
            ErrorCode::OpsUnsupported => "OPS_001",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::DbCorruptRecord => "DB_003",
            ErrorCode::NetRequestFailed => "NET_001",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl VersoError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            field: None,
        }
    }

    /// Create a validation error for a missing required field.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            message: format!("Missing required field: '{}'", field),
            code: ErrorCode::ValMissingField,
            field: Some(field.to_string()),
        }
    }

    /// Create a validation error for an inverted or out-of-bounds range.
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidRange,
            field: None,
        }
    }

    /// Create a validation error for an empty batch request.
    pub fn empty_batch(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValEmptyBatch,
            field: None,
        }
    }

    /// Create a not found error for a user id.
    pub fn not_found(user_id: impl Into<String>) -> Self {
        let id = user_id.into();
        Self::NotFound {
            message: format!("User with id '{}' not found", id),
            code: ErrorCode::UsrNotFound,
            user_id: Some(id),
        }
    }

    /// Create a not found error that is not tied to a single user id.
    pub fn not_found_message(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: ErrorCode::UsrNotFound,
            user_id: None,
        }
    }

    /// Create an unsupported operation error.
    pub fn unsupported(operation: impl Into<String>, supported: Vec<&'static str>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            supported,
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a storage error for a stored row that cannot be decoded.
    pub fn corrupt_record(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::DbCorruptRecord,
            source: None,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetRequestFailed,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::UnsupportedOperation { .. } => ErrorCode::OpsUnsupported,
            Self::Storage { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether the caller can fix this error by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::NotFound { .. } | Self::UnsupportedOperation { .. }
        )
    }

    /// Convert from HTTP status code (for client errors).
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            400 => Self::validation(body),
            401 => Self::Configuration(format!("Unauthorized: {}", body)),
            404 => Self::not_found_message(body),
            _ => Self::Internal(format!("HTTP {}: {}", status, body)),
        }
    }
}

impl From<rusqlite::Error> for VersoError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_error() {
        let err = VersoError::missing_field("email");
        assert_eq!(err.code(), ErrorCode::ValMissingField);
        assert!(err.to_string().contains("email"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_not_found_error() {
        let err = VersoError::not_found("user-1");
        assert_eq!(err.code(), ErrorCode::UsrNotFound);
        assert!(err.to_string().contains("user-1"));
    }

    #[test]
    fn test_storage_error_is_server_side() {
        let err = VersoError::storage("disk full");
        assert_eq!(err.code().as_str(), "DB_002");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_from_http_status() {
        assert_eq!(
            VersoError::from_http_status(404, "gone").code(),
            ErrorCode::UsrNotFound
        );
        assert!(matches!(
            VersoError::from_http_status(503, "down"),
            VersoError::Internal(_)
        ));
    }
}
