//! Stack and resource identities.
//!
//! A [`StackIdentity`] addresses one stack of one tenant; a
//! [`ResourceIdentity`] addresses a named resource inside such a stack.
//! Both are immutable value types whose constructors are the only
//! validation gate, so an instance always satisfies its invariants.
//!
//! # Encodings
//!
//! Identities have two string forms:
//!
//! | Form | Layout |
//! |---|---|
//! | URL path | `stacks/{stack_name}/{stack_id}[/resources/{resource_name}]` |
//! | ARN | `arn:openstack:heat::{tenant}:stacks/{stack_name}/{stack_id}[/resources/{resource_name}]` |
//!
//! Every field is percent-encoded before it is joined with `/`. The tenant
//! is not part of the URL path; it comes from the authenticated session.
//!
//! # Example
//!
//! ```
//! use cumulus_core::{Identity, StackIdentity};
//!
//! let stack = StackIdentity::new("t1", "mystack", "abc-123").unwrap();
//! assert_eq!(stack.url_path(), "stacks/mystack/abc-123");
//!
//! let parsed = Identity::from_url_path("t1", &stack.url_path()).unwrap();
//! assert_eq!(parsed, Identity::Stack(stack));
//! ```

use crate::error::IdentifierError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Separator joining identity components. Field values may not contain it.
pub const SEPARATOR: char = '/';

const STACKS: &str = "stacks";
const RESOURCES: &str = "resources";
const ARN_PREFIX: &str = "arn:openstack:heat::";

fn require(field: &'static str, value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::EmptyField { field });
    }
    Ok(())
}

fn require_segment(field: &'static str, value: &str) -> Result<(), IdentifierError> {
    require(field, value)?;
    if value.contains(SEPARATOR) {
        return Err(IdentifierError::ContainsSeparator {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

// `.` and `..` are unreserved, so they would otherwise survive encoding as
// dot segments.
fn encode(value: &str) -> Cow<'_, str> {
    match value {
        "." => Cow::Borrowed("%2E"),
        ".." => Cow::Borrowed("%2E%2E"),
        _ => urlencoding::encode(value),
    }
}

fn decode<'a>(field: &'static str, value: &'a str) -> Result<Cow<'a, str>, IdentifierError> {
    urlencoding::decode(value).map_err(|_| IdentifierError::Encoding { field })
}

/// Tenant under which stacks are scoped.
///
/// Supplied by the authentication layer, never read from the URL path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantScope(String);

impl TenantScope {
    /// Creates a tenant scope, rejecting the empty string.
    pub fn new(tenant: impl Into<String>) -> Result<Self, IdentifierError> {
        let tenant = tenant.into();
        require("tenant", &tenant)?;
        Ok(Self(tenant))
    }

    /// Returns the tenant as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantScope {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantScope> for String {
    fn from(tenant: TenantScope) -> Self {
        tenant.0
    }
}

/// Canonical key of a stack.
///
/// Serializes as its ARN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StackIdentity {
    tenant: TenantScope,
    stack_name: String,
    stack_id: String,
}

impl StackIdentity {
    /// Builds a stack identity from raw, percent-decoded fields.
    ///
    /// All fields must be non-empty; the stack name and ID must not contain
    /// [`SEPARATOR`].
    pub fn new(
        tenant: impl Into<String>,
        stack_name: impl Into<String>,
        stack_id: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        Self::in_tenant(TenantScope::new(tenant)?, stack_name, stack_id)
    }

    /// Builds a stack identity under an already validated tenant.
    pub fn in_tenant(
        tenant: TenantScope,
        stack_name: impl Into<String>,
        stack_id: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        let stack_name = stack_name.into();
        let stack_id = stack_id.into();
        require_segment("stack_name", &stack_name)?;
        require_segment("stack_id", &stack_id)?;
        Ok(Self {
            tenant,
            stack_name,
            stack_id,
        })
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant(&self) -> &TenantScope {
        &self.tenant
    }

    /// Returns the stack name.
    #[must_use]
    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    /// Returns the unique stack instance ID.
    #[must_use]
    pub fn stack_id(&self) -> &str {
        &self.stack_id
    }

    /// Returns `{stack_name}/{stack_id}`, percent-encoded.
    #[must_use]
    pub fn stack_path(&self) -> String {
        format!("{}/{}", encode(&self.stack_name), encode(&self.stack_id))
    }

    /// Returns the URL path of this stack, relative to the tenant root.
    #[must_use]
    pub fn url_path(&self) -> String {
        format!("{STACKS}/{}", self.stack_path())
    }

    /// Returns the ARN of this stack.
    #[must_use]
    pub fn arn(&self) -> String {
        format!(
            "{ARN_PREFIX}{}:{}",
            encode(self.tenant.as_str()),
            self.url_path()
        )
    }

    /// Returns the identity of the named resource inside this stack.
    pub fn resource(
        &self,
        resource_name: impl Into<String>,
    ) -> Result<ResourceIdentity, IdentifierError> {
        ResourceIdentity::new(self.clone(), resource_name)
    }
}

impl fmt::Display for StackIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arn())
    }
}

impl FromStr for StackIdentity {
    type Err = IdentifierError;

    fn from_str(arn: &str) -> Result<Self, Self::Err> {
        match Identity::from_arn(arn)? {
            Identity::Stack(stack) => Ok(stack),
            Identity::Resource(_) => Err(IdentifierError::MalformedArn {
                arn: arn.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for StackIdentity {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StackIdentity> for String {
    fn from(identity: StackIdentity) -> Self {
        identity.arn()
    }
}

/// Canonical key of a resource inside a stack.
///
/// The owning stack identity is embedded by value. Serializes as its ARN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceIdentity {
    stack: StackIdentity,
    resource_name: String,
}

impl ResourceIdentity {
    /// Builds a resource identity inside `stack`.
    ///
    /// The resource name must be non-empty and must not contain
    /// [`SEPARATOR`].
    pub fn new(
        stack: StackIdentity,
        resource_name: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        let resource_name = resource_name.into();
        require_segment("resource_name", &resource_name)?;
        Ok(Self {
            stack,
            resource_name,
        })
    }

    /// Returns the owning stack identity.
    #[must_use]
    pub fn stack(&self) -> &StackIdentity {
        &self.stack
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant(&self) -> &TenantScope {
        self.stack.tenant()
    }

    /// Returns the resource name.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Returns the path of this resource below its stack, with leading `/`.
    #[must_use]
    pub fn resource_path(&self) -> String {
        format!("/{RESOURCES}/{}", encode(&self.resource_name))
    }

    /// Returns the URL path of this resource, relative to the tenant root.
    #[must_use]
    pub fn url_path(&self) -> String {
        format!("{}{}", self.stack.url_path(), self.resource_path())
    }

    /// Returns the ARN of this resource.
    #[must_use]
    pub fn arn(&self) -> String {
        format!("{}{}", self.stack.arn(), self.resource_path())
    }

    /// Consumes the identity and returns the owning stack.
    #[must_use]
    pub fn into_stack(self) -> StackIdentity {
        self.stack
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arn())
    }
}

impl FromStr for ResourceIdentity {
    type Err = IdentifierError;

    fn from_str(arn: &str) -> Result<Self, Self::Err> {
        match Identity::from_arn(arn)? {
            Identity::Resource(resource) => Ok(resource),
            Identity::Stack(_) => Err(IdentifierError::MalformedArn {
                arn: arn.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ResourceIdentity {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceIdentity> for String {
    fn from(identity: ResourceIdentity) -> Self {
        identity.arn()
    }
}

/// Either kind of identity, as recovered from an encoded path or ARN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// A stack.
    Stack(StackIdentity),
    /// A resource inside a stack.
    Resource(ResourceIdentity),
}

impl Identity {
    /// Parses a URL path produced by [`Identity::url_path`].
    ///
    /// A single leading `/` is accepted.
    pub fn from_url_path(tenant: impl Into<String>, path: &str) -> Result<Self, IdentifierError> {
        let tenant = TenantScope::new(tenant)?;
        let malformed = || IdentifierError::MalformedPath {
            path: path.to_string(),
        };

        let trimmed = path.strip_prefix(SEPARATOR).unwrap_or(path);
        let parts: Vec<&str> = trimmed.split(SEPARATOR).collect();

        match parts.as_slice() {
            [STACKS, name, id] => {
                let stack = StackIdentity::in_tenant(
                    tenant,
                    decode("stack_name", name)?,
                    decode("stack_id", id)?,
                )?;
                Ok(Self::Stack(stack))
            }
            [STACKS, name, id, RESOURCES, resource] => {
                let stack = StackIdentity::in_tenant(
                    tenant,
                    decode("stack_name", name)?,
                    decode("stack_id", id)?,
                )?;
                let resource = ResourceIdentity::new(stack, decode("resource_name", resource)?)?;
                Ok(Self::Resource(resource))
            }
            _ => Err(malformed()),
        }
    }

    /// Parses an ARN produced by [`Identity::arn`].
    pub fn from_arn(arn: &str) -> Result<Self, IdentifierError> {
        let malformed = || IdentifierError::MalformedArn {
            arn: arn.to_string(),
        };

        let rest = arn.strip_prefix(ARN_PREFIX).ok_or_else(malformed)?;
        let (tenant, path) = rest.split_once(':').ok_or_else(malformed)?;
        let tenant = decode("tenant", tenant)?;

        Self::from_url_path(tenant, path).map_err(|err| match err {
            IdentifierError::MalformedPath { .. } => malformed(),
            other => other,
        })
    }

    /// Returns the stack this identity belongs to.
    #[must_use]
    pub fn stack(&self) -> &StackIdentity {
        match self {
            Self::Stack(stack) => stack,
            Self::Resource(resource) => resource.stack(),
        }
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant(&self) -> &TenantScope {
        self.stack().tenant()
    }

    /// Returns the URL path, relative to the tenant root.
    #[must_use]
    pub fn url_path(&self) -> String {
        match self {
            Self::Stack(stack) => stack.url_path(),
            Self::Resource(resource) => resource.url_path(),
        }
    }

    /// Returns the ARN.
    #[must_use]
    pub fn arn(&self) -> String {
        match self {
            Self::Stack(stack) => stack.arn(),
            Self::Resource(resource) => resource.arn(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arn())
    }
}

impl FromStr for Identity {
    type Err = IdentifierError;

    fn from_str(arn: &str) -> Result<Self, Self::Err> {
        Self::from_arn(arn)
    }
}

impl From<StackIdentity> for Identity {
    fn from(stack: StackIdentity) -> Self {
        Self::Stack(stack)
    }
}

impl From<ResourceIdentity> for Identity {
    fn from(resource: ResourceIdentity) -> Self {
        Self::Resource(resource)
    }
}
