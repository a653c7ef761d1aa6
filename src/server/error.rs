//! Webhook error-to-HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::any::Any;

/// Request-level webhook failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Webhook disabled or Radarr not configured
    #[error("Webhook endpoint is disabled")]
    Disabled,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::Disabled => StatusCode::NOT_FOUND,
            WebhookError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::Disabled => "not_found",
            WebhookError::Unauthorized(_) => "unauthorized",
            WebhookError::MalformedPayload(_) => "malformed_payload",
            WebhookError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Server error in webhook handler");
        } else {
            tracing::warn!(status = %status, error = %self, "Rejected webhook request");
        }

        let body = json!({
            "success": false,
            "error": self.to_string(),
            "code": self.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    WebhookError::Internal(detail).into_response()
}
