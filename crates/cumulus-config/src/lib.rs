//! Typed configuration for Cumulus.
//!
//! This crate provides a strongly-typed configuration system with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! The configuration system is built around the [`CumulusConfig`] struct:
//!
//! - [`ApiConfig`] - Application URL and error exposure
//! - [`LoggingConfig`] - Log level and output format
//!
//! # Example
//!
//! ```no_run
//! use cumulus_config::{ConfigLoader, CumulusConfig};
//!
//! # fn main() -> Result<(), cumulus_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("cumulus.toml")?
//!     .with_env_prefix("CUMULUS")
//!     .load()?;
//!
//! println!("Links resolve against: {}", config.api.application_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! application_url = "https://heat.example.com:8004/v1/"
//! expose_internal_errors = false
//! internal_error_message = "An internal error occurred"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Every value can be overridden with `PREFIX__SECTION__KEY`:
//!
//! - `CUMULUS__API__APPLICATION_URL=https://heat.example.com/v1/`
//! - `CUMULUS__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{CumulusConfig, CumulusConfigBuilder};
pub use cumulus_telemetry::LogFormat;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{
    ApiConfig, LoggingConfig, DEFAULT_APPLICATION_URL, DEFAULT_INTERNAL_ERROR_MESSAGE,
};
