//! Main configuration types.
//!
//! This module provides the top-level [`CumulusConfig`] struct and its builder.

use cumulus_telemetry::{create_env_filter, LogFormat};
use serde::{Deserialize, Serialize};

use crate::{ApiConfig, ConfigError, LoggingConfig};

/// Complete Cumulus configuration.
///
/// This is the root configuration type that contains all configuration sections.
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use cumulus_config::CumulusConfig;
///
/// let config = CumulusConfig::default();
/// assert_eq!(config.api.application_url, "http://localhost:8004/v1/");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct CumulusConfig {
    /// API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CumulusConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use cumulus_config::{ApiConfig, CumulusConfig};
    ///
    /// let config = CumulusConfig::builder()
    ///     .api(ApiConfig {
    ///         application_url: "https://heat.example.com/v1/".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.api.application_url, "https://heat.example.com/v1/");
    /// ```
    #[must_use]
    pub fn builder() -> CumulusConfigBuilder {
        CumulusConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The application URL is not an absolute http(s) URL
    /// - The log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.application_url()?;

        if self.logging.enabled {
            create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty log formatting with source locations
    /// - Debug log level
    /// - Internal error explanations exposed
    ///
    /// # Example
    ///
    /// ```
    /// use cumulus_config::CumulusConfig;
    ///
    /// let config = CumulusConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config.api.expose_internal_errors = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// - JSON log formatting
    /// - Info log level
    /// - Internal error explanations redacted
    ///
    /// # Example
    ///
    /// ```
    /// use cumulus_config::CumulusConfig;
    ///
    /// let config = CumulusConfig::production();
    /// assert!(!config.api.expose_internal_errors);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.api.expose_internal_errors = false;

        config
    }
}

/// Builder for [`CumulusConfig`].
#[derive(Debug, Default)]
pub struct CumulusConfigBuilder {
    api: Option<ApiConfig>,
    logging: Option<LoggingConfig>,
}

impl CumulusConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API configuration.
    #[must_use]
    pub fn api(mut self, api: ApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> CumulusConfig {
        CumulusConfig {
            api: self.api.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<CumulusConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
