//! Structured logging for Cumulus.
//!
//! This module installs a `tracing-subscriber` registry with an
//! [`EnvFilter`] and a single fmt layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use cumulus_telemetry::logging::{LogConfig, init_logging};
//!
//! let config = LogConfig::default();
//! init_logging(&config)?;
//!
//! tracing::info!(tenant = "t1", stack_name = "wordpress", "Resolving stack");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        })
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown log format {other:?}, expected json or pretty")),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "cumulus_core=debug,warn").
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            file_line_info: true,
            include_target: true,
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            file_line_info: false,
            include_target: true,
        }
    }
}

/// Initializes the logging subsystem.
///
/// Does nothing when logging is disabled.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidLevel` for a bad filter and
/// `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let result = match config.format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_file(config.file_line_info)
                .with_line_number(config.file_line_info)
                .with_target(config.include_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(fmt_layer).try_init()
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_file(config.file_line_info)
                .with_line_number(config.file_line_info)
                .with_target(config.include_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(fmt_layer).try_init()
        }
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    tracing::debug!(level = %config.level, format = %config.format, "logging initialized");
    Ok(())
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidLevel {
        level: filter.to_string(),
        reason: e.to_string(),
    })
}

/// Standard log fields for Cumulus.
///
/// Use these field names for consistency across logs.
pub mod fields {
    /// Request ID field name.
    pub const REQUEST_ID: &str = "request_id";

    /// Tenant field name.
    pub const TENANT: &str = "tenant";

    /// Stack name field name.
    pub const STACK_NAME: &str = "stack_name";

    /// Stack ID field name.
    pub const STACK_ID: &str = "stack_id";

    /// Resource name field name.
    pub const RESOURCE_NAME: &str = "resource_name";

    /// Pipeline stage field name.
    pub const STAGE: &str = "stage";

    /// Error category field name.
    pub const CATEGORY: &str = "category";

    /// Error field name.
    pub const ERROR: &str = "error";
}
