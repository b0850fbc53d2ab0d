//! # Cumulus Core
//!
//! Identity model and error taxonomy for the Cumulus orchestration API.
//!
//! This crate provides the value types request handlers work with:
//!
//! - [`StackIdentity`] / [`ResourceIdentity`] - Validated, immutable identities
//! - [`Identity`] - Either kind, as parsed from a URL path or ARN
//! - [`Link`] - Hyperlinks embedded in response bodies
//! - [`ApiError`] - Boundary error with a fixed [`ErrorCategory`]
//! - [`map_backend_error`] - Classification of orchestration engine errors
//! - [`RequestContext`] - Per-request state filled by the enrichment pipeline

#![doc(html_root_url = "https://docs.rs/cumulus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod backend;
mod context;
mod error;
pub mod identifier;
pub mod link;
pub mod params;

pub use backend::{map_backend_error, BackendError, BackendErrorKind, ExistencePolicy};
pub use context::{ApplicationUrl, RelativeUrl, RequestContext, RequestId};
pub use error::{
    ApiError, ApiResult, ErrorCategory, ErrorDetail, ErrorEnvelope, IdentifierError,
};
pub use identifier::{Identity, ResourceIdentity, StackIdentity, TenantScope, SEPARATOR};
pub use link::{build_link, IdentityFields, Link};
pub use params::PathParams;
