//! Core enrichment trait.
//!
//! An [`Enricher`] is one pipeline stage: a pure function from the context
//! resolved so far plus the request's path parameters to a context with
//! one more identity filled in.
//!
//! # Example
//!
//! ```
//! use cumulus_core::{ApiResult, PathParams, RequestContext};
//! use cumulus_middleware::Enricher;
//!
//! struct Passthrough;
//!
//! impl Enricher for Passthrough {
//!     fn name(&self) -> &'static str {
//!         "passthrough"
//!     }
//!
//!     fn enrich(&self, ctx: RequestContext, _params: &PathParams) -> ApiResult<RequestContext> {
//!         Ok(ctx)
//!     }
//! }
//! ```

use cumulus_core::{ApiError, ApiResult, PathParams, RequestContext};

/// A context-enrichment stage.
///
/// # Invariants
///
/// - Stages MUST NOT perform I/O; they only validate and build values
/// - A stage either returns an enriched context or the error to report
pub trait Enricher: Send + Sync + 'static {
    /// Returns the unique name of this stage.
    ///
    /// This name is used for logging and in failure reports.
    fn name(&self) -> &'static str;

    /// Enriches the context from the path parameters.
    fn enrich(&self, ctx: RequestContext, params: &PathParams) -> ApiResult<RequestContext>;
}

/// A stage created from a plain function.
///
/// # Example
///
/// ```
/// use cumulus_middleware::{Enricher, FnEnricher};
///
/// let stage = FnEnricher::new("noop", |ctx, _params| Ok(ctx));
/// assert_eq!(stage.name(), "noop");
/// ```
pub struct FnEnricher<F> {
    name: &'static str,
    func: F,
}

impl<F> FnEnricher<F>
where
    F: Fn(RequestContext, &PathParams) -> ApiResult<RequestContext> + Send + Sync + 'static,
{
    /// Creates a new function-based stage.
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Enricher for FnEnricher<F>
where
    F: Fn(RequestContext, &PathParams) -> ApiResult<RequestContext> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn enrich(&self, ctx: RequestContext, params: &PathParams) -> ApiResult<RequestContext> {
        (self.func)(ctx, params)
    }
}

/// Returns the named parameter or the bad request to report.
pub(crate) fn required<'p>(params: &'p PathParams, name: &str) -> ApiResult<&'p str> {
    params
        .get(name)
        .ok_or_else(|| ApiError::bad_request(format!("missing path parameter {name}")))
}
