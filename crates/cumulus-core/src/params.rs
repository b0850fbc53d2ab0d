//! Path parameters handed over by the dispatch layer.
//!
//! Values are stored already percent-decoded. Identity routes carry at most
//! four parameters (tenant, stack name, stack ID, resource name), so they
//! are kept inline without a heap allocation.

use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Well-known parameter names used by the identity routes.
pub mod names {
    /// Tenant the request is scoped to.
    pub const TENANT_ID: &str = "tenant_id";
    /// Stack name segment.
    pub const STACK_NAME: &str = "stack_name";
    /// Stack instance ID segment.
    pub const STACK_ID: &str = "stack_id";
    /// Resource name segment.
    pub const RESOURCE_NAME: &str = "resource_name";
}

/// Extracted path parameters from a route match.
///
/// # Example
///
/// ```rust
/// use cumulus_core::PathParams;
///
/// let params = PathParams::from_iter([("stack_name", "mystack"), ("stack_id", "abc-123")]);
///
/// assert_eq!(params.get("stack_name"), Some("mystack"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathParams {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl PathParams {
    /// Creates a new empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns a new set with the parameter added.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<N, V> FromIterator<(N, V)> for PathParams
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
