//! Classification of errors reported by the orchestration engine.
//!
//! The engine reports failures as a symbolic kind plus a message. This
//! module maps each kind onto an [`ErrorCategory`], keeping the message
//! verbatim as the explanation.
//!
//! | Backend kind | Category |
//! |---|---|
//! | `InvalidAttribute`, `InvalidValue` | `BadRequest` or `NotFound` (see [`ExistencePolicy`]) |
//! | `StackNotFound`, `ResourceNotFound`, `PhysicalResourceNotFound`, `EntityNotFound` | `NotFound` |
//! | `ResourceNotAvailable` | `NotFound` |
//! | `InvalidTenant`, `Forbidden` | `Forbidden` |
//! | `StackExists` | `Conflict` |
//! | anything else | `Internal` |
//!
//! The mapping is total; unknown kinds are never dropped.

use crate::error::{ApiError, ErrorCategory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An error reported by the orchestration engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendError {
    /// The symbolic kind, e.g. `StackNotFound` or `stack-not-found`.
    pub kind: String,
    /// The engine's message.
    pub message: String,
}

impl BackendError {
    /// Creates a backend error.
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Parses the kind of this error.
    #[must_use]
    pub fn parsed_kind(&self) -> BackendErrorKind {
        // Infallible: unknown kinds parse to `Other`.
        self.kind
            .parse()
            .unwrap_or_else(|_| BackendErrorKind::Other(self.kind.clone()))
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendError {}

/// Kinds of engine errors the API knows how to classify.
///
/// Parsing ignores case, whitespace, `-` and `_`, so the engine's class names
/// (`ValueError`) and symbolic names (`value-error`) are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BackendErrorKind {
    /// A request referenced an attribute that does not exist.
    InvalidAttribute,
    /// A request carried an unusable value.
    InvalidValue,
    /// No stack matched.
    StackNotFound,
    /// No resource matched.
    ResourceNotFound,
    /// The resource exists but is not yet available.
    ResourceNotAvailable,
    /// No physical resource matched.
    PhysicalResourceNotFound,
    /// Some other entity was not found.
    EntityNotFound,
    /// The stack belongs to a different tenant.
    InvalidTenant,
    /// The operation is not permitted.
    Forbidden,
    /// A stack with that name already exists.
    StackExists,
    /// Anything not listed above.
    Other(String),
}

impl BackendErrorKind {
    /// Returns the category of this kind under `policy`.
    #[must_use]
    pub fn category(&self, policy: ExistencePolicy) -> ErrorCategory {
        match self {
            Self::InvalidAttribute | Self::InvalidValue => policy.client_error(),
            Self::StackNotFound
            | Self::ResourceNotFound
            | Self::ResourceNotAvailable
            | Self::PhysicalResourceNotFound
            | Self::EntityNotFound => ErrorCategory::NotFound,
            Self::InvalidTenant | Self::Forbidden => ErrorCategory::Forbidden,
            Self::StackExists => ErrorCategory::Conflict,
            Self::Other(_) => ErrorCategory::Internal,
        }
    }
}

impl FromStr for BackendErrorKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        Ok(match normalized.as_str() {
            "attributeerror" | "invalidattribute" => Self::InvalidAttribute,
            "valueerror" | "invalidvalue" => Self::InvalidValue,
            "stacknotfound" => Self::StackNotFound,
            "resourcenotfound" => Self::ResourceNotFound,
            "resourcenotavailable" | "resourceunavailable" => Self::ResourceNotAvailable,
            "physicalresourcenotfound" => Self::PhysicalResourceNotFound,
            "entitynotfound" | "notfound" => Self::EntityNotFound,
            "invalidtenant" | "tenantmismatch" => Self::InvalidTenant,
            "forbidden" | "notpermitted" => Self::Forbidden,
            "stackexists" | "entityalreadyexists" | "alreadyexists" => Self::StackExists,
            _ => Self::Other(s.to_string()),
        })
    }
}

/// How to classify errors that blame the caller's input.
///
/// An invalid attribute or value usually means the addressed entity is
/// missing. When the caller has asserted that it exists, the same error
/// means the request itself is bad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExistencePolicy {
    /// Treat input errors as `NotFound`.
    #[default]
    AssumeMissing,
    /// Treat input errors as `BadRequest`.
    MustExist,
}

impl ExistencePolicy {
    const fn client_error(self) -> ErrorCategory {
        match self {
            Self::AssumeMissing => ErrorCategory::NotFound,
            Self::MustExist => ErrorCategory::BadRequest,
        }
    }
}

impl From<bool> for ExistencePolicy {
    fn from(force_exists: bool) -> Self {
        if force_exists {
            Self::MustExist
        } else {
            Self::AssumeMissing
        }
    }
}

/// Maps an engine error to the API error returned to the caller.
///
/// The engine's message is kept verbatim as the explanation.
///
/// # Example
///
/// ```
/// use cumulus_core::{map_backend_error, BackendError, ErrorCategory, ExistencePolicy};
///
/// let err = BackendError::new("StackNotFound", "The Stack (s1) could not be found.");
/// let api = map_backend_error(&err, ExistencePolicy::AssumeMissing);
/// assert_eq!(api.category(), ErrorCategory::NotFound);
/// assert_eq!(api.explanation(), "The Stack (s1) could not be found.");
/// ```
#[must_use]
pub fn map_backend_error(error: &BackendError, policy: ExistencePolicy) -> ApiError {
    let category = error.parsed_kind().category(policy);

    if category == ErrorCategory::Internal {
        tracing::warn!(kind = %error.kind, "unclassified backend error");
        metrics::counter!("cumulus_backend_errors_unclassified_total").increment(1);
    } else {
        tracing::debug!(kind = %error.kind, %category, "mapped backend error");
    }
    metrics::counter!("cumulus_backend_errors_total", "category" => category.code()).increment(1);

    ApiError::new(category, error.message.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(kind: &str, policy: ExistencePolicy) -> ErrorCategory {
        map_backend_error(&BackendError::new(kind, "msg"), policy).category()
    }

    #[test]
    fn test_policy_flag() {
        assert_eq!(map("value-error", ExistencePolicy::MustExist), ErrorCategory::BadRequest);
        assert_eq!(map("value-error", ExistencePolicy::AssumeMissing), ErrorCategory::NotFound);
        assert_eq!(map("AttributeError", true.into()), ErrorCategory::BadRequest);
        assert_eq!(map("AttributeError", false.into()), ErrorCategory::NotFound);
    }

    #[test]
    fn test_default_policy_is_assume_missing() {
        assert_eq!(ExistencePolicy::default(), ExistencePolicy::AssumeMissing);
    }

    #[test]
    fn test_not_found_kinds_ignore_policy() {
        for kind in [
            "StackNotFound",
            "ResourceNotFound",
            "ResourceNotAvailable",
            "PhysicalResourceNotFound",
            "entity-not-found",
            "resource-unavailable",
        ] {
            for policy in [ExistencePolicy::AssumeMissing, ExistencePolicy::MustExist] {
                assert_eq!(map(kind, policy), ErrorCategory::NotFound, "{kind}");
            }
        }
    }

    #[test]
    fn test_forbidden_and_conflict() {
        assert_eq!(map("InvalidTenant", ExistencePolicy::default()), ErrorCategory::Forbidden);
        assert_eq!(map("tenant-mismatch", ExistencePolicy::default()), ErrorCategory::Forbidden);
        assert_eq!(map("forbidden", ExistencePolicy::default()), ErrorCategory::Forbidden);
        assert_eq!(map("StackExists", ExistencePolicy::default()), ErrorCategory::Conflict);
        assert_eq!(
            map("entity-already-exists", ExistencePolicy::default()),
            ErrorCategory::Conflict
        );
    }

    #[test]
    fn test_unknown_kinds_are_internal() {
        for kind in ["", "KeyError", "StackValidationFailed", "not-a-kind", "💥"] {
            for policy in [ExistencePolicy::AssumeMissing, ExistencePolicy::MustExist] {
                assert_eq!(map(kind, policy), ErrorCategory::Internal, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = BackendError::new("KeyError", "x").parsed_kind();
        assert_eq!(kind, BackendErrorKind::Other("KeyError".to_string()));
    }

    #[test]
    fn test_explanation_preserved_verbatim() {
        let message = "The Stack (wordpress) could not be found.\n  trailing ";
        let err = BackendError::new("StackNotFound", message);
        let api = map_backend_error(&err, ExistencePolicy::MustExist);
        assert_eq!(api.explanation(), message);
    }

    #[test]
    fn test_kind_parsing_is_case_and_separator_insensitive() {
        for name in [
            "StackNotFound",
            "stack-not-found",
            "STACK_NOT_FOUND",
            "stacknotfound",
            "Stack Not Found",
            " stack\tnot found\n",
        ] {
            assert_eq!(
                name.parse::<BackendErrorKind>().unwrap(),
                BackendErrorKind::StackNotFound
            );
        }
    }

    #[test]
    fn test_spaced_category_names() {
        let cases = [
            ("not found", ExistencePolicy::MustExist, ErrorCategory::NotFound),
            ("Not Found", ExistencePolicy::AssumeMissing, ErrorCategory::NotFound),
            ("already exists", ExistencePolicy::AssumeMissing, ErrorCategory::Conflict),
            ("not permitted", ExistencePolicy::AssumeMissing, ErrorCategory::Forbidden),
            ("invalid value", ExistencePolicy::AssumeMissing, ErrorCategory::NotFound),
            ("invalid value", ExistencePolicy::MustExist, ErrorCategory::BadRequest),
        ];
        for (kind, policy, category) in cases {
            assert_eq!(map(kind, policy), category, "{kind:?}");
        }
    }
}
