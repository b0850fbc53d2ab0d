//! # Cumulus
//!
//! **Stack and resource addressing for an orchestration API**
//!
//! Cumulus turns the path segments of an API request into validated
//! identities, builds hyperlinks back to them, and maps engine failures to
//! HTTP errors:
//!
//! - **Identities** – Stack and resource identities with URL path and ARN forms
//! - **Enrichment** – A fixed tenant → stack → resource pipeline run before handlers
//! - **Links** – `{"href", "rel"}` objects resolved against the application URL
//! - **Errors** – A closed error taxonomy rendered as a JSON envelope
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cumulus::config::ConfigLoader;
//! use cumulus::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("cumulus.toml")?
//!         .with_env_prefix("CUMULUS")
//!         .load()?;
//!     cumulus::init_logging(&config)?;
//!
//!     let gateway = Gateway::from_config(&config)?;
//!     let params = PathParams::new()
//!         .with(names::TENANT_ID, "t1")
//!         .with(names::STACK_NAME, "wordpress")
//!         .with(names::STACK_ID, "abc-123");
//!
//!     let ctx = gateway.tenant_context("t1")?;
//!     match gateway.resolve(Stage::Stack, ctx, &params) {
//!         Ok(ctx) => println!("{}", ctx.stack().unwrap().arn()),
//!         Err(failure) => println!("{}", gateway.render_error(&failure.error, None).body),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PathParams → Tenant → Stack → Resource → Handler
//!                                             ↓
//!                    ErrorEnvelope ← Renderer ← ApiError
//! ```

#![doc(html_root_url = "https://docs.rs/cumulus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod gateway;

// Re-export core types
pub use cumulus_core as core;

// Re-export middleware types
pub use cumulus_middleware as middleware;

// Re-export configuration types
pub use cumulus_config as config;

// Re-export telemetry types
pub use cumulus_telemetry as telemetry;

pub use cumulus_middleware::Stage;
pub use gateway::Gateway;

/// Installs the global log subscriber described by `config.logging`.
///
/// # Errors
///
/// Returns `TelemetryError` if the level is invalid or a subscriber is
/// already installed.
pub fn init_logging(config: &config::CumulusConfig) -> telemetry::TelemetryResult<()> {
    telemetry::init_logging(&config.logging.to_log_config())
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use cumulus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Gateway;

    pub use cumulus_core::params::names;
    pub use cumulus_core::{
        ApiError, ApiResult, BackendError, ErrorCategory, ExistencePolicy, Identity,
        IdentityFields, Link, PathParams, RelativeUrl, RequestContext, RequestId,
        ResourceIdentity, StackIdentity, TenantScope,
    };

    pub use cumulus_middleware::{Enricher, FnEnricher, Pipeline, Stage, StageFailure};

    pub use cumulus_config::{ConfigLoader, CumulusConfig};
}
