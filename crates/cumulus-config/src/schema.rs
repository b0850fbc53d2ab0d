//! Configuration section types.
//!
//! Each section maps to a table in the configuration file.

use cumulus_core::ApplicationUrl;
use cumulus_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default root URL of the orchestration API.
pub const DEFAULT_APPLICATION_URL: &str = "http://localhost:8004/v1/";

/// Default message for redacted internal errors.
pub const DEFAULT_INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// API section.
///
/// Controls how links are resolved and how errors are shown to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Root URL that links are resolved against.
    ///
    /// Requests are scoped below it by tenant.
    #[serde(default = "default_application_url")]
    pub application_url: String,

    /// Whether internal error explanations are returned to callers.
    #[serde(default = "default_true")]
    pub expose_internal_errors: bool,

    /// Replacement message when internal errors are not exposed.
    #[serde(default = "default_internal_error_message")]
    pub internal_error_message: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            application_url: default_application_url(),
            expose_internal_errors: true,
            internal_error_message: default_internal_error_message(),
        }
    }
}

impl ApiConfig {
    /// Parses the configured application URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` unless the value is an absolute
    /// http or https URL.
    pub fn application_url(&self) -> Result<ApplicationUrl, ConfigError> {
        ApplicationUrl::parse(&self.application_url).map_err(|e| {
            ConfigError::invalid_value(
                "api.application_url",
                format!("{:?} is not an absolute http(s) URL: {e}", self.application_url),
            )
        })
    }
}

fn default_application_url() -> String {
    DEFAULT_APPLICATION_URL.to_string()
}

fn default_internal_error_message() -> String {
    DEFAULT_INTERNAL_ERROR_MESSAGE.to_string()
}

fn default_true() -> bool {
    true
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (e.g. `info`, `cumulus_core=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts this section into the telemetry crate's logging settings.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            file_line_info: self.include_location,
            include_target: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
