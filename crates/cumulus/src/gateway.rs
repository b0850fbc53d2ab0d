//! Configured entry point for request handling.

use cumulus_config::{ConfigError, CumulusConfig};
use cumulus_core::{
    build_link, map_backend_error, ApiError, ApiResult, ApplicationUrl, BackendError,
    ExistencePolicy, IdentityFields, Link, PathParams, RequestContext, TenantScope,
};
use cumulus_middleware::{ErrorRenderer, Pipeline, RenderedError, Stage, StageFailure};

/// Everything a request handler needs, built once from configuration.
///
/// Holds the application root URL, one pipeline per [`Stage`] and the
/// error renderer. Cheap to clone and safe to share between threads.
///
/// # Example
///
/// ```
/// use cumulus::config::CumulusConfig;
/// use cumulus::core::params::names;
/// use cumulus::core::PathParams;
/// use cumulus::{Gateway, Stage};
///
/// let gateway = Gateway::from_config(&CumulusConfig::default()).unwrap();
/// let params = PathParams::new()
///     .with(names::TENANT_ID, "t1")
///     .with(names::STACK_NAME, "wordpress")
///     .with(names::STACK_ID, "abc-123");
///
/// let ctx = gateway.tenant_context("t1").unwrap();
/// let ctx = gateway.resolve(Stage::Stack, ctx, &params).unwrap();
/// let link = gateway.link(&ctx, ctx.stack().unwrap().into(), None).unwrap();
/// assert_eq!(link.href, "http://localhost:8004/v1/t1/stacks/wordpress/abc-123");
/// ```
#[derive(Debug, Clone)]
pub struct Gateway {
    application_url: ApplicationUrl,
    tenant: Pipeline,
    stack: Pipeline,
    resource: Pipeline,
    renderer: ErrorRenderer,
}

impl Gateway {
    /// Creates a gateway from its parts.
    #[must_use]
    pub fn new(application_url: ApplicationUrl, renderer: ErrorRenderer) -> Self {
        Self {
            application_url,
            tenant: Pipeline::through(Stage::Tenant),
            stack: Pipeline::through(Stage::Stack),
            resource: Pipeline::through(Stage::Resource),
            renderer,
        }
    }

    /// Builds a gateway from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration does not validate.
    pub fn from_config(config: &CumulusConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let renderer = ErrorRenderer::new()
            .expose_internal_errors(config.api.expose_internal_errors)
            .internal_error_message(config.api.internal_error_message.clone());

        let gateway = Self::new(config.api.application_url()?, renderer);
        tracing::info!(
            application_url = %gateway.application_url,
            expose_internal_errors = config.api.expose_internal_errors,
            "gateway configured"
        );
        Ok(gateway)
    }

    /// Returns the application root URL.
    #[must_use]
    pub fn application_url(&self) -> &ApplicationUrl {
        &self.application_url
    }

    /// Returns a fresh context rooted at the application URL.
    #[must_use]
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.application_url.clone())
    }

    /// Returns a fresh context whose links resolve below the tenant's root.
    ///
    /// # Errors
    ///
    /// Returns a bad request for an empty tenant.
    pub fn tenant_context(&self, tenant: &str) -> ApiResult<RequestContext> {
        let tenant = TenantScope::new(tenant)?;
        let url = self.application_url.for_tenant(&tenant).map_err(|e| {
            ApiError::internal_with_source("cannot build tenant application URL", e)
        })?;
        Ok(RequestContext::new(url).with_tenant(tenant))
    }

    /// Runs the enrichment stages up to and including `target`.
    pub fn resolve(
        &self,
        target: Stage,
        ctx: RequestContext,
        params: &PathParams,
    ) -> Result<RequestContext, StageFailure> {
        let pipeline = match target {
            Stage::Tenant => &self.tenant,
            Stage::Stack => &self.stack,
            Stage::Resource => &self.resource,
        };
        pipeline.run(ctx, params)
    }

    /// Builds a link to the identity in `fields`, relative to the request.
    ///
    /// # Errors
    ///
    /// Returns an internal error if `fields` is not a valid identity.
    pub fn link(
        &self,
        ctx: &RequestContext,
        fields: IdentityFields,
        relationship: Option<&str>,
    ) -> ApiResult<Link> {
        build_link(ctx, fields, relationship)
    }

    /// Maps an engine error for the caller.
    #[must_use]
    pub fn backend_error(&self, error: &BackendError, policy: ExistencePolicy) -> ApiError {
        map_backend_error(error, policy)
    }

    /// Renders an error, tagged with the request ID when a context is given.
    #[must_use]
    pub fn render_error(&self, error: &ApiError, ctx: Option<&RequestContext>) -> RenderedError {
        self.renderer.render(error, ctx.map(RequestContext::request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus_core::ErrorCategory;
    use http::StatusCode;

    fn gateway() -> Gateway {
        Gateway::from_config(&CumulusConfig::default()).unwrap()
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = CumulusConfig::default();
        config.api.application_url = "relative/path".to_string();
        assert!(Gateway::from_config(&config).is_err());
    }

    #[test]
    fn test_context_is_rooted() {
        assert_eq!(
            gateway().context().application_url().as_str(),
            "http://localhost:8004/v1/"
        );
    }

    #[test]
    fn test_tenant_context() {
        let ctx = gateway().tenant_context("t1").unwrap();
        assert_eq!(ctx.application_url().as_str(), "http://localhost:8004/v1/t1/");
        assert_eq!(ctx.tenant().unwrap().as_str(), "t1");
    }

    #[test]
    fn test_tenant_context_rejects_empty() {
        let err = gateway().tenant_context("").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::BadRequest);
    }

    #[test]
    fn test_render_error_uses_config() {
        let mut config = CumulusConfig::production();
        config.api.internal_error_message = "service unavailable".to_string();
        let gateway = Gateway::from_config(&config).unwrap();

        let ctx = gateway.context();
        let rendered = gateway.render_error(&ApiError::internal("db down"), Some(&ctx));
        assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rendered.body["error"]["message"], "service unavailable");
        assert_eq!(rendered.body["request_id"], ctx.request_id().to_string());
    }

    #[test]
    fn test_backend_error() {
        let err = gateway().backend_error(
            &BackendError::new("ValueError", "bad"),
            ExistencePolicy::MustExist,
        );
        assert_eq!(err.category(), ErrorCategory::BadRequest);
    }
}
