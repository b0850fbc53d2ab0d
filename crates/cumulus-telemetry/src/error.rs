//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level string is not a valid filter directive.
    #[error("Invalid log level {level:?}: {reason}")]
    InvalidLevel {
        /// The rejected directive.
        level: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Failed to install the global subscriber.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}
