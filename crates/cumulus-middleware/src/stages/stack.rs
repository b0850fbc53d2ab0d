//! Stack identity stage.
//!
//! Builds a [`StackIdentity`] from the `stack_name` and `stack_id` path
//! segments under the tenant resolved by the [`TenantStage`].
//!
//! [`TenantStage`]: crate::stages::TenantStage

use crate::enricher::{required, Enricher};
use cumulus_core::params::names;
use cumulus_core::{ApiError, ApiResult, PathParams, RequestContext, StackIdentity};

/// Stage that resolves the stack identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackStage;

impl StackStage {
    /// Creates a new stack stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for StackStage {
    fn name(&self) -> &'static str {
        "stack"
    }

    fn enrich(&self, ctx: RequestContext, params: &PathParams) -> ApiResult<RequestContext> {
        let tenant = ctx
            .tenant()
            .cloned()
            .ok_or_else(|| ApiError::internal("stack resolved before tenant"))?;

        let stack = StackIdentity::in_tenant(
            tenant,
            required(params, names::STACK_NAME)?,
            required(params, names::STACK_ID)?,
        )?;

        tracing::trace!(
            request_id = %ctx.request_id(),
            stack_name = stack.stack_name(),
            stack_id = stack.stack_id(),
            "stack resolved"
        );
        Ok(ctx.with_stack(stack))
    }
}
