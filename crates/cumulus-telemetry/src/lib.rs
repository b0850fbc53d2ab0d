//! Structured logging for Cumulus.
//!
//! Every Cumulus crate emits `tracing` events with a shared set of field
//! names (see [`logging::fields`]). This crate installs the subscriber that
//! turns those events into output:
//!
//! - **JSON** for production, one object per line
//! - **Pretty** for development, with source locations
//!
//! The filter comes from the configured level, which accepts any
//! `EnvFilter` directive such as `info` or `cumulus_core=debug,warn`.
//!
//! # Example
//!
//! ```rust,ignore
//! use cumulus_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(tenant = "t1", "logging ready");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
