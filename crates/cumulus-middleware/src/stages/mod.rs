//! Core enrichment stages.
//!
//! These stages execute in a fixed order; each one builds on the identity
//! resolved by its predecessor.
//!
//! 1. [`tenant`] - Scope the request to the tenant from the route
//! 2. [`stack`] - Resolve the stack identity
//! 3. [`resource`] - Resolve the resource identity

pub mod resource;
pub mod stack;
pub mod tenant;

pub use resource::ResourceStage;
pub use stack::StackStage;
pub use tenant::TenantStage;
