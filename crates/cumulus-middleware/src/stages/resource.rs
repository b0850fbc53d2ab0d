//! Resource identity stage.
//!
//! Builds a [`ResourceIdentity`] from the `resource_name` path segment
//! inside the stack resolved by the [`StackStage`].
//!
//! [`StackStage`]: crate::stages::StackStage

use crate::enricher::{required, Enricher};
use cumulus_core::params::names;
use cumulus_core::{ApiError, ApiResult, PathParams, RequestContext, ResourceIdentity};

/// Stage that resolves the resource identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceStage;

impl ResourceStage {
    /// Creates a new resource stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for ResourceStage {
    fn name(&self) -> &'static str {
        "resource"
    }

    fn enrich(&self, ctx: RequestContext, params: &PathParams) -> ApiResult<RequestContext> {
        let stack = ctx
            .stack()
            .cloned()
            .ok_or_else(|| ApiError::internal("resource resolved before stack"))?;

        let resource = ResourceIdentity::new(stack, required(params, names::RESOURCE_NAME)?)?;

        tracing::trace!(
            request_id = %ctx.request_id(),
            resource_name = resource.resource_name(),
            "resource resolved"
        );
        Ok(ctx.with_resource(resource))
    }
}
