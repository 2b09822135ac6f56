//! # Design
//!
//! - Centralize bootstrap errors behind one type returned from `main`.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error raised by `anyhow`-based subsystems.
pub type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Settings could not be turned into a configuration.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: intake_config::ConfigError,
    },
    /// Logging or metrics setup failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: BoxedError,
    },
    /// The tracker client could not be built.
    #[error("tracker operation failed")]
    Tracker {
        /// Operation identifier.
        operation: &'static str,
        /// Source tracker error.
        source: intake_core::TrackerError,
    },
    /// The API listener failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source server error.
        source: BoxedError,
    },
    /// Configuration values were invalid.
    #[error("invalid configuration")]
    InvalidConfig {
        /// Field name that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Optional value associated with the failure.
        value: Option<String>,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: intake_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) fn telemetry(operation: &'static str, source: anyhow::Error) -> Self {
        Self::Telemetry {
            operation,
            source: source.into(),
        }
    }

    pub(crate) const fn tracker(
        operation: &'static str,
        source: intake_core::TrackerError,
    ) -> Self {
        Self::Tracker { operation, source }
    }

    pub(crate) fn api_server(operation: &'static str, source: anyhow::Error) -> Self {
        Self::ApiServer {
            operation,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.from_args",
            intake_config::ConfigError::MissingSetting {
                name: "INTAKE_TRACKER_TOKEN",
            },
        );
        assert!(matches!(
            config,
            AppError::Config {
                operation: "config.from_args",
                ..
            }
        ));
        assert!(config.source().is_some());

        let telemetry = AppError::telemetry("telemetry.init", anyhow::anyhow!("already set"));
        assert!(matches!(telemetry, AppError::Telemetry { .. }));
        assert_eq!(
            telemetry.source().map(ToString::to_string).as_deref(),
            Some("already set")
        );

        let tracker = AppError::tracker(
            "tracker.new",
            intake_core::TrackerError::Decode {
                operation: "list_fields",
                source: "bad json".into(),
            },
        );
        assert!(matches!(tracker, AppError::Tracker { .. }));

        let api = AppError::api_server("api_server.serve", anyhow::anyhow!("bind"));
        assert_eq!(api.to_string(), "api server operation failed");
    }
}
