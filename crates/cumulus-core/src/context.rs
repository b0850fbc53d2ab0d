//! Request context types.
//!
//! The [`RequestContext`] carries per-request state through the enrichment
//! pipeline and into handlers: the request ID, the URL the API is mounted
//! at, and the tenant, stack and resource identities resolved so far.

use crate::error::IdentifierError;
use crate::identifier::{ResourceIdentity, StackIdentity, TenantScope};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Produces URLs relative to the current request.
///
/// Implemented by whatever the dispatch layer uses to represent a request.
pub trait RelativeUrl {
    /// Resolves `path` against the request.
    ///
    /// With `to_application` the path is resolved against the root the API
    /// is mounted at; otherwise against the URL of the current request.
    fn relative_url(&self, path: &str, to_application: bool) -> String;
}

/// Absolute URL at which the API is mounted, e.g. `http://host:8004/v1/t1/`.
///
/// Always ends in `/` so that joining appends below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationUrl(Url);

impl ApplicationUrl {
    /// Parses an application URL.
    ///
    /// Only absolute `http` and `https` URLs are accepted.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(input)?;
        Self::from_url(url)
    }

    /// Wraps an already parsed URL, adding the trailing `/` if missing.
    pub fn from_url(mut url: Url) -> Result<Self, url::ParseError> {
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self(url))
    }

    /// Returns the URL one level below this one, for a tenant root.
    pub fn for_tenant(&self, tenant: &TenantScope) -> Result<Self, url::ParseError> {
        let segment = urlencoding::encode(tenant.as_str());
        Self::from_url(self.0.join(&format!("{segment}/"))?)
    }

    /// Appends `path` below this URL.
    ///
    /// Dot segments in `path` are kept as they are, so the result never
    /// leaves this URL.
    #[must_use]
    pub fn below(&self, path: &str) -> String {
        format!("{}{}", self.0, path.trim_start_matches('/'))
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ApplicationUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl std::str::FromStr for ApplicationUrl {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Per-request context that flows through the enrichment pipeline.
///
/// Each pipeline stage returns a new context with one more identity slot
/// filled. Slots are only ever filled with validated identities.
///
/// # Example
///
/// ```
/// use cumulus_core::{ApplicationUrl, RequestContext, RelativeUrl};
///
/// let app = ApplicationUrl::parse("http://localhost:8004/v1/t1").unwrap();
/// let ctx = RequestContext::new(app);
/// assert_eq!(
///     ctx.relative_url("stacks/s/1", true),
///     "http://localhost:8004/v1/t1/stacks/s/1"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    application_url: ApplicationUrl,
    request_url: Option<Url>,
    tenant: Option<TenantScope>,
    stack: Option<StackIdentity>,
    resource: Option<ResourceIdentity>,
}

impl RequestContext {
    /// Creates a new context with a fresh request ID.
    #[must_use]
    pub fn new(application_url: ApplicationUrl) -> Self {
        Self::with_request_id(RequestId::new(), application_url)
    }

    /// Creates a new context with the specified request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId, application_url: ApplicationUrl) -> Self {
        Self {
            request_id,
            application_url,
            request_url: None,
            tenant: None,
            stack: None,
            resource: None,
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the application URL.
    #[must_use]
    pub fn application_url(&self) -> &ApplicationUrl {
        &self.application_url
    }

    /// Returns a new context with the URL of the current request.
    #[must_use]
    pub fn with_request_url(mut self, url: Url) -> Self {
        self.request_url = Some(url);
        self
    }

    /// Returns the tenant scope, if resolved.
    #[must_use]
    pub fn tenant(&self) -> Option<&TenantScope> {
        self.tenant.as_ref()
    }

    /// Returns a new context scoped to `tenant`.
    ///
    /// Any identities resolved under a previous tenant are dropped.
    #[must_use]
    pub fn with_tenant(mut self, tenant: TenantScope) -> Self {
        if self.tenant.as_ref() != Some(&tenant) {
            self.stack = None;
            self.resource = None;
        }
        self.tenant = Some(tenant);
        self
    }

    /// Returns the stack identity, if resolved.
    #[must_use]
    pub fn stack(&self) -> Option<&StackIdentity> {
        self.stack.as_ref()
    }

    /// Returns a new context addressing `stack`.
    ///
    /// The tenant follows the stack; a previously resolved resource is
    /// dropped.
    #[must_use]
    pub fn with_stack(mut self, stack: StackIdentity) -> Self {
        self.tenant = Some(stack.tenant().clone());
        self.resource = None;
        self.stack = Some(stack);
        self
    }

    /// Returns the resource identity, if resolved.
    #[must_use]
    pub fn resource(&self) -> Option<&ResourceIdentity> {
        self.resource.as_ref()
    }

    /// Returns a new context addressing `resource`.
    #[must_use]
    pub fn with_resource(mut self, resource: ResourceIdentity) -> Self {
        self.tenant = Some(resource.tenant().clone());
        self.stack = Some(resource.stack().clone());
        self.resource = Some(resource);
        self
    }

    /// Returns the tenant scope or the error a handler should report.
    pub fn require_tenant(&self) -> Result<&TenantScope, IdentifierError> {
        self.tenant
            .as_ref()
            .ok_or(IdentifierError::EmptyField { field: "tenant" })
    }
}

impl RelativeUrl for RequestContext {
    fn relative_url(&self, path: &str, to_application: bool) -> String {
        match (&self.request_url, to_application) {
            (Some(request), false) => request
                .join(path)
                .map_or_else(|_| self.application_url.below(path), String::from),
            _ => self.application_url.below(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ApplicationUrl {
        ApplicationUrl::parse("http://localhost:8004/v1/t1").unwrap()
    }

    #[test]
    fn test_request_id_new_generates_unique_ids() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2, "Each RequestId should be unique");
    }

    #[test]
    fn test_request_id_serialization() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).expect("serialization should work");
        let parsed: RequestId = serde_json::from_str(&json).expect("deserialization should work");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_application_url_adds_trailing_slash() {
        assert_eq!(app().as_str(), "http://localhost:8004/v1/t1/");
    }

    #[test]
    fn test_application_url_drops_query() {
        let url = ApplicationUrl::parse("https://api.example.com/v1/?x=1#frag").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn test_application_url_rejects_non_http() {
        assert!(ApplicationUrl::parse("mailto:ops@example.com").is_err());
        assert!(ApplicationUrl::parse("ftp://example.com/").is_err());
        assert!(ApplicationUrl::parse("/v1/").is_err());
    }

    #[test]
    fn test_application_url_for_tenant() {
        let root = ApplicationUrl::parse("http://localhost:8004/v1/").unwrap();
        let tenant = TenantScope::new("t 1").unwrap();
        assert_eq!(
            root.for_tenant(&tenant).unwrap().as_str(),
            "http://localhost:8004/v1/t%201/"
        );
    }

    #[test]
    fn test_relative_url_to_application() {
        let ctx = RequestContext::new(app());
        assert_eq!(
            ctx.relative_url("stacks/mystack/abc-123", true),
            "http://localhost:8004/v1/t1/stacks/mystack/abc-123"
        );
        assert_eq!(
            ctx.relative_url("/stacks/mystack/abc-123", true),
            "http://localhost:8004/v1/t1/stacks/mystack/abc-123"
        );
    }

    #[test]
    fn test_relative_url_to_request() {
        let request = Url::parse("http://localhost:8004/v1/t1/stacks/").unwrap();
        let ctx = RequestContext::new(app()).with_request_url(request);
        assert_eq!(
            ctx.relative_url("mystack", false),
            "http://localhost:8004/v1/t1/stacks/mystack"
        );
        assert_eq!(
            ctx.relative_url("stacks/mystack/abc-123", true),
            "http://localhost:8004/v1/t1/stacks/mystack/abc-123"
        );
    }

    #[test]
    fn test_relative_url_to_request_resolves_references() {
        let request = Url::parse("http://localhost:8004/v1/t1/stacks/mystack/abc-123").unwrap();
        let ctx = RequestContext::new(app()).with_request_url(request);
        assert_eq!(
            ctx.relative_url("resources", false),
            "http://localhost:8004/v1/t1/stacks/mystack/resources"
        );
        assert_eq!(
            ctx.relative_url("/v1/t2/stacks", false),
            "http://localhost:8004/v1/t2/stacks"
        );
    }

    #[test]
    fn test_relative_url_falls_back_to_application() {
        let request = Url::parse("http://localhost:8004/v1/t1/stacks/").unwrap();
        let ctx = RequestContext::new(app()).with_request_url(request);
        assert_eq!(
            ctx.relative_url("http://[::1/stacks", false),
            "http://localhost:8004/v1/t1/http://[::1/stacks"
        );
    }

    #[test]
    fn test_relative_url_keeps_encoded_dot_segments() {
        let ctx = RequestContext::new(app());
        assert_eq!(
            ctx.relative_url("stacks/%2E%2E/abc", true),
            "http://localhost:8004/v1/t1/stacks/%2E%2E/abc"
        );
    }

    #[test]
    fn test_relative_url_without_request_url_uses_application() {
        let ctx = RequestContext::new(app());
        assert_eq!(
            ctx.relative_url("stacks", false),
            "http://localhost:8004/v1/t1/stacks"
        );
    }

    #[test]
    fn test_with_stack_sets_tenant() {
        let stack = StackIdentity::new("t1", "s", "1").unwrap();
        let ctx = RequestContext::new(app()).with_stack(stack.clone());
        assert_eq!(ctx.tenant().map(TenantScope::as_str), Some("t1"));
        assert_eq!(ctx.stack(), Some(&stack));
        assert!(ctx.resource().is_none());
    }

    #[test]
    fn test_changing_tenant_drops_identities() {
        let stack = StackIdentity::new("t1", "s", "1").unwrap();
        let resource = stack.resource("r").unwrap();
        let ctx = RequestContext::new(app())
            .with_resource(resource)
            .with_tenant(TenantScope::new("t2").unwrap());
        assert!(ctx.stack().is_none());
        assert!(ctx.resource().is_none());
    }

    #[test]
    fn test_same_tenant_keeps_identities() {
        let stack = StackIdentity::new("t1", "s", "1").unwrap();
        let ctx = RequestContext::new(app())
            .with_stack(stack.clone())
            .with_tenant(TenantScope::new("t1").unwrap());
        assert_eq!(ctx.stack(), Some(&stack));
    }

    #[test]
    fn test_require_tenant() {
        let ctx = RequestContext::new(app());
        assert!(ctx.require_tenant().is_err());
        let ctx = ctx.with_tenant(TenantScope::new("t1").unwrap());
        assert_eq!(ctx.require_tenant().unwrap().as_str(), "t1");
    }
}
