//! Error types for Cumulus.
//!
//! This module provides the [`ApiError`] type, the error every request
//! handler ultimately reports, and the [`IdentifierError`] raised while
//! building stack and resource identities.
//!
//! # Categories
//!
//! The boundary layer only ever sees five categories, each with a fixed
//! HTTP status code:
//!
//! | `ErrorCategory` | Status |
//! |---|---|
//! | `BadRequest` | 400 |
//! | `NotFound` | 404 |
//! | `Forbidden` | 403 |
//! | `Conflict` | 409 |
//! | `Internal` | 500 |
//!
//! Categories serialize with `snake_case` names that match the JSON
//! envelope format.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// Categories of API errors surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The request was malformed or referenced invalid values.
    BadRequest,
    /// The addressed stack or resource does not exist.
    NotFound,
    /// The caller may not act on the addressed tenant.
    Forbidden,
    /// The entity already exists.
    Conflict,
    /// Anything the API could not classify.
    Internal,
}

impl ErrorCategory {
    /// Every category, in status-code order of the boundary table.
    pub const ALL: [ErrorCategory; 5] = [
        Self::BadRequest,
        Self::NotFound,
        Self::Forbidden,
        Self::Conflict,
        Self::Internal,
    ];

    /// Returns the HTTP status code for this error category.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code used in envelopes.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Returns `true` for categories reported as a 4xx status.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Error raised when an identity cannot be constructed or parsed.
///
/// Always recoverable: the caller rejects the request as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// A required field was empty.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A field contained the path separator.
    #[error("{field} may not contain \"/\": {value:?}")]
    ContainsSeparator {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A URL path did not follow the identity layout.
    #[error("invalid identity path: {path:?}")]
    MalformedPath {
        /// The rejected path.
        path: String,
    },

    /// An ARN did not follow the identity layout.
    #[error("invalid identity ARN: {arn:?}")]
    MalformedArn {
        /// The rejected ARN.
        arn: String,
    },

    /// A percent-encoded field did not decode to UTF-8.
    #[error("{field} is not valid percent-encoded UTF-8")]
    Encoding {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Standard error type reported at the API boundary.
///
/// Each variant carries the explanation surfaced to the caller. Use
/// [`ApiError::category`] to select the response status.
///
/// # Example
///
/// ```
/// use cumulus_core::{ApiError, ErrorCategory};
///
/// let error = ApiError::not_found("The Stack (wordpress) could not be found.");
/// assert_eq!(error.category(), ErrorCategory::NotFound);
/// assert_eq!(error.status_code().as_u16(), 404);
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request.
    #[error("Bad request: {explanation}")]
    BadRequest {
        /// Human-readable explanation.
        explanation: String,
    },

    /// Addressed entity does not exist.
    #[error("Not found: {explanation}")]
    NotFound {
        /// Human-readable explanation.
        explanation: String,
    },

    /// Caller may not access the tenant.
    #[error("Forbidden: {explanation}")]
    Forbidden {
        /// Human-readable explanation.
        explanation: String,
    },

    /// Entity already exists.
    #[error("Conflict: {explanation}")]
    Conflict {
        /// Human-readable explanation.
        explanation: String,
    },

    /// Internal server error.
    #[error("Internal error: {explanation}")]
    Internal {
        /// Human-readable explanation.
        explanation: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ApiError {
    /// Creates an error of the given category.
    #[must_use]
    pub fn new(category: ErrorCategory, explanation: impl Into<String>) -> Self {
        let explanation = explanation.into();
        match category {
            ErrorCategory::BadRequest => Self::BadRequest { explanation },
            ErrorCategory::NotFound => Self::NotFound { explanation },
            ErrorCategory::Forbidden => Self::Forbidden { explanation },
            ErrorCategory::Conflict => Self::Conflict { explanation },
            ErrorCategory::Internal => Self::Internal {
                explanation,
                source: None,
            },
        }
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(explanation: impl Into<String>) -> Self {
        Self::BadRequest {
            explanation: explanation.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(explanation: impl Into<String>) -> Self {
        Self::NotFound {
            explanation: explanation.into(),
        }
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden(explanation: impl Into<String>) -> Self {
        Self::Forbidden {
            explanation: explanation.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(explanation: impl Into<String>) -> Self {
        Self::Conflict {
            explanation: explanation.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(explanation: impl Into<String>) -> Self {
        Self::Internal {
            explanation: explanation.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        explanation: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            explanation: explanation.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::BadRequest { .. } => ErrorCategory::BadRequest,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Forbidden { .. } => ErrorCategory::Forbidden,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().status_code()
    }

    /// Returns the explanation text, without the category prefix.
    #[must_use]
    pub fn explanation(&self) -> &str {
        match self {
            Self::BadRequest { explanation }
            | Self::NotFound { explanation }
            | Self::Forbidden { explanation }
            | Self::Conflict { explanation }
            | Self::Internal { explanation, .. } => explanation,
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.category().code().to_string(),
                message: self.explanation().to_string(),
                category: self.category(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }
}

impl From<IdentifierError> for ApiError {
    fn from(err: IdentifierError) -> Self {
        Self::bad_request(err.to_string())
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_status_codes() {
        assert_eq!(ErrorCategory::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCategory::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCategory::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCategory::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCategory::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_error_split() {
        for category in ErrorCategory::ALL {
            assert_eq!(
                category.is_client_error(),
                category.status_code().is_client_error(),
                "{category:?}"
            );
        }
    }

    #[test]
    fn test_new_matches_category() {
        for category in ErrorCategory::ALL {
            let error = ApiError::new(category, "boom");
            assert_eq!(error.category(), category);
            assert_eq!(error.explanation(), "boom");
        }
    }

    #[test]
    fn test_identifier_error_is_bad_request() {
        let error: ApiError = IdentifierError::EmptyField { field: "stack_name" }.into();
        assert_eq!(error.category(), ErrorCategory::BadRequest);
        assert_eq!(error.explanation(), "stack_name must not be empty");
    }

    #[test]
    fn test_separator_message() {
        let err = IdentifierError::ContainsSeparator {
            field: "stack_name",
            value: "a/b".to_string(),
        };
        assert_eq!(err.to_string(), "stack_name may not contain \"/\": \"a/b\"");
    }

    #[test]
    fn test_internal_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let error = ApiError::internal_with_source("lookup failed", io);
        assert_eq!(error.category(), ErrorCategory::Internal);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_error_envelope_serialization() {
        let error = ApiError::conflict("The Stack (s1) already exists.");
        let envelope = error.to_envelope(Some("req-456"));

        let json = serde_json::to_string(&envelope).expect("serialization should work");
        assert!(json.contains("\"code\":\"CONFLICT\""));
        assert!(json.contains("\"message\":\"The Stack (s1) already exists.\""));
        assert!(json.contains("\"request_id\":\"req-456\""));
        assert!(json.contains("\"category\":\"conflict\""));
    }

    #[test]
    fn test_envelope_without_request_id() {
        let envelope = ApiError::not_found("gone").to_envelope(None);
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("request_id").is_none());
        assert_eq!(json["error"]["category"], "not_found");
    }
}
