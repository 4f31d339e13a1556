//! Application error taxonomy and its HTTP mapping.
//!
//! Every failure surfaced to the presentation layer is one of the kinds below;
//! raw storage errors never escape. Each kind maps to a stable `code` string
//! in the JSON error body:
//!
//! ```json
//! { "error": { "code": "code_taken", "message": "...", "details": { } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::entities::LinkStatus;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload, also embedded in per-item results.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input other than the short code.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// A custom short code failed syntax validation.
    #[error("{message}")]
    InvalidCode { message: String, details: Value },

    /// A custom short code is already allocated. Never substituted.
    #[error("Short code '{code}' is already taken")]
    CodeTaken { code: String },

    /// Random code allocation kept colliding. Retryable.
    #[error("Could not allocate a unique short code after {attempts} attempts")]
    CodeExhausted { attempts: usize },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The link exists but is suspended or deleted.
    #[error("Link '{code}' is unavailable ({status})")]
    Unavailable { code: String, status: LinkStatus },

    #[error("Cannot change link status from {from} to {to}")]
    InvalidTransition { from: LinkStatus, to: LinkStatus },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    Forbidden { message: String, details: Value },

    /// Storage or network failure. Safe to retry.
    #[error("{message}")]
    Transient { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_code(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidCode {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn transient(message: impl Into<String>, details: Value) -> Self {
        Self::Transient {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::InvalidCode { .. } => "invalid_code",
            Self::CodeTaken { .. } => "code_taken",
            Self::CodeExhausted { .. } => "code_exhausted",
            Self::NotFound { .. } => "not_found",
            Self::Unavailable { .. } => "unavailable",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
            Self::Transient { .. } => "transient_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidCode { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::CodeTaken { .. } | Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::Unavailable { .. } => StatusCode::GONE,
            Self::CodeExhausted { .. } | Self::Transient { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns true if the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CodeExhausted { .. } | Self::Transient { .. })
    }

    fn details(&self) -> Value {
        match self {
            Self::Validation { details, .. }
            | Self::InvalidCode { details, .. }
            | Self::NotFound { details, .. }
            | Self::Unauthorized { details, .. }
            | Self::Forbidden { details, .. }
            | Self::Transient { details, .. } => details.clone(),
            Self::CodeTaken { code } => json!({ "code": code }),
            Self::CodeExhausted { attempts } => json!({ "attempts": attempts }),
            Self::Unavailable { code, status } => json!({ "code": code, "status": status }),
            Self::InvalidTransition { from, to } => json!({ "from": from, "to": to }),
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.kind(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        AppError::transient("Storage temporarily unavailable", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_map_to_statuses() {
        let cases = [
            (
                AppError::invalid_code("bad", json!({})),
                StatusCode::BAD_REQUEST,
                "invalid_code",
            ),
            (
                AppError::CodeTaken {
                    code: "my-link".to_string(),
                },
                StatusCode::CONFLICT,
                "code_taken",
            ),
            (
                AppError::CodeExhausted { attempts: 5 },
                StatusCode::SERVICE_UNAVAILABLE,
                "code_exhausted",
            ),
            (
                AppError::not_found("missing", json!({})),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                AppError::Unavailable {
                    code: "abc".to_string(),
                    status: LinkStatus::Suspended,
                },
                StatusCode::GONE,
                "unavailable",
            ),
            (
                AppError::transient("db down", json!({})),
                StatusCode::SERVICE_UNAVAILABLE,
                "transient_error",
            ),
        ];

        for (err, status, kind) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn test_not_found_and_unavailable_are_distinct() {
        let missing = AppError::not_found("Short link not found", json!({}));
        let gone = AppError::Unavailable {
            code: "abc".to_string(),
            status: LinkStatus::Deleted,
        };

        assert_ne!(missing.kind(), gone.kind());
        assert_ne!(missing.to_string(), gone.to_string());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(AppError::CodeExhausted { attempts: 5 }.is_retryable());
        assert!(AppError::transient("x", json!({})).is_retryable());
        assert!(
            !AppError::CodeTaken {
                code: "x".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_info_carries_details() {
        let info = AppError::InvalidTransition {
            from: LinkStatus::Deleted,
            to: LinkStatus::Active,
        }
        .to_error_info();

        assert_eq!(info.code, "invalid_transition");
        assert_eq!(info.details["from"], "deleted");
        assert_eq!(info.details["to"], "active");
    }
}
