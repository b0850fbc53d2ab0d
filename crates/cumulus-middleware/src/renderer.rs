//! Error rendering.
//!
//! Converts an [`ApiError`] into the status code and JSON body the HTTP
//! layer sends to the client.
//!
//! # Error Envelope Format
//!
//! ```json
//! {
//!   "error": {
//!     "code": "NOT_FOUND",
//!     "message": "The Stack (wordpress) could not be found.",
//!     "category": "not_found"
//!   },
//!   "request_id": "uuid-v7-request-id"
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use cumulus_core::ApiError;
//! use cumulus_middleware::ErrorRenderer;
//!
//! let renderer = ErrorRenderer::new().expose_internal_errors(false);
//! let rendered = renderer.render(&ApiError::internal("db down"), None);
//! assert_eq!(rendered.status.as_u16(), 500);
//! assert_eq!(rendered.body["error"]["message"], "An internal error occurred");
//! ```

use cumulus_core::{ApiError, RequestId};
use http::StatusCode;

/// Default message for redacted internal errors.
pub const DEFAULT_INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Renders API errors into response parts.
#[derive(Debug, Clone)]
pub struct ErrorRenderer {
    /// Whether internal error explanations reach the client.
    expose_internal_errors: bool,
    /// Message used for redacted internal errors.
    internal_error_message: String,
}

/// Response parts for an error.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The JSON envelope.
    pub body: serde_json::Value,
}

impl RenderedError {
    /// Returns the body serialized as a JSON string.
    #[must_use]
    pub fn body_string(&self) -> String {
        self.body.to_string()
    }
}

impl Default for ErrorRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorRenderer {
    /// Creates a renderer that passes every explanation through.
    #[must_use]
    pub fn new() -> Self {
        Self {
            expose_internal_errors: true,
            internal_error_message: DEFAULT_INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Sets whether to expose internal error explanations.
    #[must_use]
    pub fn expose_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    /// Sets the message used for redacted internal errors.
    #[must_use]
    pub fn internal_error_message(mut self, message: impl Into<String>) -> Self {
        self.internal_error_message = message.into();
        self
    }

    /// Renders `error` into a status code and JSON envelope.
    ///
    /// Client errors always keep their explanation.
    #[must_use]
    pub fn render(&self, error: &ApiError, request_id: Option<RequestId>) -> RenderedError {
        let request_id = request_id.map(|id| id.to_string());
        let mut envelope = error.to_envelope(request_id.as_deref());

        if !error.category().is_client_error() {
            tracing::error!(
                request_id = request_id.as_deref().unwrap_or("-"),
                error = %error,
                "internal error"
            );
            if !self.expose_internal_errors {
                envelope.error.message = self.internal_error_message.clone();
            }
        }

        let body = serde_json::to_value(&envelope).unwrap_or_else(|_| {
            serde_json::json!({
                "error": { "code": envelope.error.code, "message": envelope.error.message }
            })
        });

        RenderedError {
            status: error.status_code(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_client_error() {
        let rendered = ErrorRenderer::new()
            .expose_internal_errors(false)
            .render(&ApiError::not_found("The Stack (s1) could not be found."), None);

        assert_eq!(rendered.status, StatusCode::NOT_FOUND);
        assert_eq!(rendered.body["error"]["code"], "NOT_FOUND");
        assert_eq!(
            rendered.body["error"]["message"],
            "The Stack (s1) could not be found."
        );
        assert!(rendered.body.get("request_id").is_none());
    }

    #[test]
    fn test_exposes_internal_by_default() {
        let rendered = ErrorRenderer::new().render(&ApiError::internal("Invalid Stack address"), None);
        assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rendered.body["error"]["message"], "Invalid Stack address");
    }

    #[test]
    fn test_redacts_internal_when_configured() {
        let rendered = ErrorRenderer::new()
            .expose_internal_errors(false)
            .internal_error_message("try again later")
            .render(&ApiError::internal("secret detail"), None);
        assert_eq!(rendered.body["error"]["message"], "try again later");
        assert!(!rendered.body_string().contains("secret detail"));
    }

    #[test]
    fn test_includes_request_id() {
        let id = RequestId::new();
        let rendered = ErrorRenderer::new().render(&ApiError::conflict("exists"), Some(id));
        assert_eq!(rendered.status, StatusCode::CONFLICT);
        assert_eq!(rendered.body["request_id"], id.to_string());
    }
}
