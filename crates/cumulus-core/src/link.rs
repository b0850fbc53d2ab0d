//! Hyperlinks embedded in API response bodies.
//!
//! A [`Link`] pairs an `href` resolved against the request with a
//! relationship label:
//!
//! ```json
//! {"href": "http://host:8004/v1/t1/stacks/mystack/abc-123", "rel": "self"}
//! ```

use crate::context::RelativeUrl;
use crate::error::{ApiError, IdentifierError};
use crate::identifier::{Identity, ResourceIdentity, StackIdentity};
use serde::{Deserialize, Serialize};

/// Relationship label used when none is given.
pub const SELF_REL: &str = "self";

/// A link structure for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL of the target.
    pub href: String,
    /// Relationship of the target to the containing document.
    pub rel: String,
}

impl Link {
    /// Builds a link to `identity`.
    ///
    /// Cannot fail: a typed identity always has a URL path.
    #[must_use]
    pub fn to_identity(
        req: &impl RelativeUrl,
        identity: &Identity,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            href: req.relative_url(&identity.url_path(), true),
            rel: relationship.into(),
        }
    }

    /// Builds a `self` link to `identity`.
    #[must_use]
    pub fn self_link(req: &impl RelativeUrl, identity: &Identity) -> Self {
        Self::to_identity(req, identity, SELF_REL)
    }
}

/// Loosely-typed identity record, as found in stored references and
/// engine responses.
///
/// `path` is empty for stacks and `/resources/{name}` for resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFields {
    /// Owning tenant.
    #[serde(default)]
    pub tenant: Option<String>,
    /// Stack name.
    #[serde(default)]
    pub stack_name: Option<String>,
    /// Stack instance ID.
    #[serde(default)]
    pub stack_id: Option<String>,
    /// Path below the stack.
    #[serde(default)]
    pub path: Option<String>,
}

impl IdentityFields {
    /// Validates the record into a typed identity.
    pub fn into_identity(self) -> Result<Identity, IdentifierError> {
        let tenant = self.tenant.unwrap_or_default();
        let stack = StackIdentity::new(
            tenant,
            self.stack_name.unwrap_or_default(),
            self.stack_id.unwrap_or_default(),
        )?;

        match self.path.as_deref() {
            None | Some("") => Ok(Identity::Stack(stack)),
            Some(path) => {
                let full = format!("{}{path}", stack.url_path());
                Identity::from_url_path(stack.tenant().as_str(), &full)
            }
        }
    }
}

impl From<&StackIdentity> for IdentityFields {
    fn from(stack: &StackIdentity) -> Self {
        Self {
            tenant: Some(stack.tenant().to_string()),
            stack_name: Some(stack.stack_name().to_string()),
            stack_id: Some(stack.stack_id().to_string()),
            path: Some(String::new()),
        }
    }
}

impl From<&ResourceIdentity> for IdentityFields {
    fn from(resource: &ResourceIdentity) -> Self {
        Self {
            path: Some(resource.resource_path()),
            ..Self::from(resource.stack())
        }
    }
}

impl From<&Identity> for IdentityFields {
    fn from(identity: &Identity) -> Self {
        match identity {
            Identity::Stack(stack) => stack.into(),
            Identity::Resource(resource) => resource.into(),
        }
    }
}

/// Returns a link structure for the supplied identity record.
///
/// Records are only ever produced from identities this crate built, so a
/// record that does not validate is reported as an internal error.
pub fn build_link(
    req: &impl RelativeUrl,
    fields: IdentityFields,
    relationship: Option<&str>,
) -> Result<Link, ApiError> {
    let identity = fields.into_identity().map_err(|err| {
        tracing::error!(error = %err, "cannot build link to invalid identity");
        ApiError::internal_with_source("Invalid Stack address", err)
    })?;

    Ok(Link::to_identity(
        req,
        &identity,
        relationship.unwrap_or(SELF_REL),
    ))
}
