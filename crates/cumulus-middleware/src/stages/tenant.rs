//! Tenant scoping stage.
//!
//! The session tenant already in the context is authoritative. A routed
//! `tenant_id` must agree with it; without a session tenant the routed
//! value is used.

use crate::enricher::{required, Enricher};
use cumulus_core::params::names;
use cumulus_core::{ApiError, ApiResult, PathParams, RequestContext, TenantScope};

/// Stage that scopes the context to a tenant.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantStage;

impl TenantStage {
    /// Creates a new tenant stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for TenantStage {
    fn name(&self) -> &'static str {
        "tenant"
    }

    fn enrich(&self, ctx: RequestContext, params: &PathParams) -> ApiResult<RequestContext> {
        if let Some(session) = ctx.tenant() {
            if let Some(routed) = params.get(names::TENANT_ID) {
                if routed != session.as_str() {
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        tenant = %session,
                        routed_tenant = routed,
                        "routed tenant does not match session"
                    );
                    return Err(ApiError::forbidden(format!(
                        "tenant {routed:?} is not accessible from this session"
                    )));
                }
            }
            return Ok(ctx);
        }

        let tenant = TenantScope::new(required(params, names::TENANT_ID)?)?;
        tracing::trace!(request_id = %ctx.request_id(), tenant = %tenant, "tenant scoped");
        Ok(ctx.with_tenant(tenant))
    }
}
