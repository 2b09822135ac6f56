//! Error types for configuration loading.

use thiserror::Error;

/// Errors raised while validating configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was missing or blank.
    #[error("missing required setting")]
    MissingSetting {
        /// Setting name (environment variable).
        name: &'static str,
    },
    /// A setting held a value that could not be used.
    #[error("invalid setting value")]
    InvalidSetting {
        /// Setting name (environment variable).
        name: &'static str,
        /// Offending value.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
