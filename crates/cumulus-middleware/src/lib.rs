//! # Cumulus Middleware
//!
//! Request enrichment for the Cumulus API.
//!
//! Before a handler runs, the dispatch layer turns the routed path segments
//! into typed identities by running a fixed-order pipeline:
//!
//! ```text
//! PathParams → Tenant → Stack → Resource → Handler
//! ```
//!
//! | Stage | Reads | Produces |
//! |-------|-------|----------|
//! | 1 | `tenant_id` | [`TenantScope`](cumulus_core::TenantScope) |
//! | 2 | `stack_name`, `stack_id` | [`StackIdentity`](cumulus_core::StackIdentity) |
//! | 3 | `resource_name` | [`ResourceIdentity`](cumulus_core::ResourceIdentity) |
//!
//! Each stage is a pure function of the context and the parameters, so
//! each can be tested alone. The pipeline stops at the first failing stage
//! and reports its name.
//!
//! Errors are turned into responses by the [`ErrorRenderer`].
//!
//! ## Example
//!
//! ```
//! use cumulus_middleware::pipeline::{Pipeline, Stage};
//!
//! let pipeline = Pipeline::through(Stage::Resource);
//! assert_eq!(pipeline.stage_names(), vec!["tenant", "stack", "resource"]);
//! ```

#![doc(html_root_url = "https://docs.rs/cumulus-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod enricher;
pub mod pipeline;
pub mod renderer;
pub mod stages;

pub use enricher::{Enricher, FnEnricher};
pub use pipeline::{Pipeline, PipelineBuilder, Stage, StageFailure};
pub use renderer::{ErrorRenderer, RenderedError};
