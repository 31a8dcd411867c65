//! Error types and handling for the Planted API server.
//!
//! This module provides a unified error type [`AppError`] covering every
//! failure a generation request can hit, and its conversion into the flat
//! `{error, message?, details?}` JSON bodies clients expect.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Operator hint returned alongside a missing-credential error.
pub const MISSING_KEY_HINT: &str = "Set OPENAI_API_KEY in the server environment";

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Any method other than POST on a generation endpoint
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The endpoint's mandatory field is absent or has the wrong shape.
    /// Carries the complete client-facing message, e.g. `goal is required`.
    #[error("{0}")]
    MissingField(String),

    /// Body is not JSON or an optional field has the wrong type
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// No completion API credential configured
    #[error("OpenAI API key not configured")]
    NotConfigured,

    /// Non-2xx answer from the completion API, relayed with its status
    #[error("OpenAI API error (status {status})")]
    Upstream { status: u16, details: Value },

    /// Transport failure or unusable completion payload
    #[error("Failed to generate {artifact}: {message}")]
    Generation {
        artifact: &'static str,
        message: String,
    },

    /// Completion text could not be turned into the structured envelope
    #[error("Failed to parse {artifact}: {message}")]
    MalformedCompletion {
        artifact: &'static str,
        message: String,
    },

    /// Generic internal server errors with custom message
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingField(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Generation { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::MalformedCompletion { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// JSON body for this error.
    pub fn body(&self) -> Value {
        match self {
            AppError::MethodNotAllowed => json!({ "error": "Method not allowed" }),
            AppError::MissingField(msg) => json!({ "error": msg }),
            AppError::InvalidBody(msg) => json!({
                "error": "Invalid request body",
                "message": msg
            }),
            AppError::NotConfigured => json!({
                "error": "OpenAI API key not configured",
                "message": MISSING_KEY_HINT
            }),
            AppError::Upstream { details, .. } => json!({
                "error": "OpenAI API error",
                "details": details
            }),
            AppError::Generation { artifact, message } => json!({
                "error": format!("Failed to generate {}", artifact),
                "message": message
            }),
            AppError::MalformedCompletion { artifact, message } => json!({
                "error": format!("Failed to parse {}", artifact),
                "message": message
            }),
            AppError::Internal(msg) => json!({
                "error": "Internal server error",
                "message": msg
            }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Convenience type alias for Results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = AppError::MethodNotAllowed;
        assert_eq!(err.to_string(), "Method not allowed");

        let err = AppError::MissingField("goal is required".to_string());
        assert_eq!(err.to_string(), "goal is required");

        let err = AppError::Generation {
            artifact: "nutrition plan",
            message: "connection reset".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to generate nutrition plan: connection reset"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::MissingField("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidBody("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotConfigured.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::MalformedCompletion {
                artifact: "recipe results",
                message: "x".into()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_upstream_status_is_relayed() {
        let err = AppError::Upstream {
            status: 429,
            details: json!({ "error": "rate_limited" }),
        };
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            err.body(),
            json!({ "error": "OpenAI API error", "details": { "error": "rate_limited" } })
        );
    }

    #[test]
    fn test_invalid_upstream_status_falls_back_to_bad_gateway() {
        let err = AppError::Upstream {
            status: 42,
            details: Value::Null,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_configured_body() {
        assert_eq!(
            AppError::NotConfigured.body(),
            json!({
                "error": "OpenAI API key not configured",
                "message": "Set OPENAI_API_KEY in the server environment"
            })
        );
    }

    #[test]
    fn test_generation_body() {
        let err = AppError::Generation {
            artifact: "plant care plan",
            message: "dns failure".to_string(),
        };
        assert_eq!(
            err.body(),
            json!({ "error": "Failed to generate plant care plan", "message": "dns failure" })
        );
    }

    #[tokio::test]
    async fn test_into_response_writes_json_body() {
        let response = AppError::MissingField("goal is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "goal is required" }));
    }
}
