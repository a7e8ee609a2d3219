use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Reporting errors (lookups, classification, escalation, notification)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    ServiceUnavailable,

    // Reporting (E1xxx)
    MessageNotFound,
    ModChannelMissing,
    ClassifierUnavailable,
    EscalationFailed,
    DeliveryFailed,
    RuntimeUnavailable,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::ServiceUnavailable => "E0003",

            // Reporting
            Self::MessageNotFound => "E1001",
            Self::ModChannelMissing => "E1002",
            Self::ClassifierUnavailable => "E1003",
            Self::EscalationFailed => "E1004",
            Self::DeliveryFailed => "E1005",
            Self::RuntimeUnavailable => "E1006",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::EscalationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::MessageNotFound | Self::ModChannelMissing => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable | Self::ClassifierUnavailable
            | Self::RuntimeUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::DeliveryFailed => StatusCode::BAD_GATEWAY,
        }
    }

    /// Whether this code describes a missing resource rather than a transport fault.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == StatusCode::NOT_FOUND
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known { code: ErrorCode, message: String },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
        }
    }

    /// The error code, if this is a known application error.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Known { code, .. } => Some(*code),
            Self::Internal(_) => Some(ErrorCode::InternalError),
            Self::Validation(_) => Some(ErrorCode::ValidationError),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code().map(|c| c.is_not_found()).unwrap_or(false)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message } => {
                (code.status_code(), ApiErrorResponse::new(code.code(), message))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn known_error_uses_code_and_status() {
        let (status, value) =
            body_json(AppError::new(ErrorCode::MessageNotFound, "message 3 not found")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "E1001");
        assert_eq!(value["error"]["message"], "message 3 not found");
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let (status, value) =
            body_json(AppError::Internal(anyhow::anyhow!("socket closed"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["error"]["message"], "internal server error");
    }

    #[test]
    fn not_found_classification() {
        assert!(AppError::new(ErrorCode::MessageNotFound, "gone").is_not_found());
        assert!(AppError::new(ErrorCode::ModChannelMissing, "none").is_not_found());
        assert!(!AppError::new(ErrorCode::ServiceUnavailable, "down").is_not_found());
        assert!(!AppError::new(ErrorCode::ClassifierUnavailable, "down").is_not_found());
        assert!(!AppError::Validation("bad".into()).is_not_found());
    }
}
