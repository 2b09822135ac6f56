use std::sync::Arc;

use clap::Parser;
use intake_api::{ApiServer, ApiState};
use intake_config::{IntakeArgs, IntakeConfig};
use intake_core::{OptionCache, TaskTracker};
use intake_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics};
use intake_tracker::HttpTaskTracker;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Dependencies required to bootstrap the intake service.
pub(crate) struct BootstrapDependencies {
    config: IntakeConfig,
    telemetry: Metrics,
    tracker: Arc<dyn TaskTracker>,
}

impl BootstrapDependencies {
    /// Build production dependencies from the command line and environment.
    pub(crate) fn from_args(args: IntakeArgs) -> AppResult<Self> {
        let config =
            IntakeConfig::from_args(args).map_err(|err| AppError::config("config.from_args", err))?;
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        let tracker = HttpTaskTracker::new(&config.tracker)
            .map_err(|err| AppError::tracker("tracker.new", err))?;

        Ok(Self {
            config,
            telemetry,
            tracker: Arc::new(tracker),
        })
    }
}

/// Entry point for the intake boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, logging or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_args(IntakeArgs::parse())?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let BootstrapDependencies {
        config,
        telemetry,
        tracker,
    } = dependencies;

    let logging = logging_config(&config)?;
    intake_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("intake");

    info!(
        list_id = %config.tracker.list_id,
        tracker = %config.tracker.base_url,
        "intake bootstrap starting"
    );
    if !config.is_loopback() {
        info!(addr = %config.server.addr, "listener is reachable beyond loopback");
    }

    let state = build_state(config, tracker, telemetry).await;
    let addr = state.config().server.addr;
    info!(addr = %addr, "Launching API listener");

    ApiServer::new(state)
        .serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

/// Warm the option cache and assemble shared handler state.
///
/// A failed warm-up is tolerated; every submission refreshes again.
pub(crate) async fn build_state(
    config: IntakeConfig,
    tracker: Arc<dyn TaskTracker>,
    telemetry: Metrics,
) -> Arc<ApiState> {
    let cache = Arc::new(OptionCache::new(telemetry.clone()));
    cache.refresh(tracker.as_ref()).await;
    if cache.is_empty() {
        warn!("option cache is empty after warm-up; enumerated answers fall back to text");
    } else {
        info!(fields = cache.len(), "option cache warmed");
    }
    Arc::new(ApiState::new(Arc::new(config), tracker, cache, telemetry))
}

fn logging_config(config: &IntakeConfig) -> AppResult<LoggingConfig<'_>> {
    let format = config
        .server
        .log_format
        .parse::<LogFormat>()
        .map_err(|_| AppError::InvalidConfig {
            field: "log_format",
            reason: "unknown_format",
            value: Some(config.server.log_format.clone()),
        })?;
    Ok(LoggingConfig {
        level: &config.server.log_level,
        format,
        ..LoggingConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};
    use std::time::Duration;

    use intake_config::{
        CohortCatalog, CohortOption, FieldMap, PaymentCatalog, ServerSettings, TrackerSettings,
    };

    use super::*;

    fn config(base_url: &str, log_format: &str) -> AppResult<IntakeConfig> {
        let base_url = base_url
            .parse::<url::Url>()
            .map_err(|_| AppError::InvalidConfig {
                field: "base_url",
                reason: "not_a_url",
                value: Some(base_url.to_string()),
            })?;
        let cohort = |label: &str, option_id: &str| CohortOption {
            label: label.to_string(),
            keywords: vec![label.to_ascii_lowercase()],
            option_id: option_id.to_string(),
        };
        Ok(IntakeConfig {
            server: ServerSettings {
                addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
                request_deadline: Duration::from_secs(30),
                max_video_bytes: 1024 * 1024,
                log_level: "debug".to_string(),
                log_format: log_format.to_string(),
            },
            tracker: TrackerSettings {
                base_url,
                token: "pk_test".to_string(),
                list_id: "L1".to_string(),
                timeout: Duration::from_secs(1),
            },
            fields: FieldMap {
                cohort: "cf-cohort".to_string(),
                payment_method: "cf-pay".to_string(),
                ..FieldMap::default()
            },
            cohorts: CohortCatalog {
                options: [cohort("October", "opt-oct"), cohort("January", "opt-jan")],
            },
            payments: PaymentCatalog {
                upfront: "pay-up".to_string(),
                installments: "pay-inst".to_string(),
                financing: "pay-fin".to_string(),
            },
        })
    }

    #[test]
    fn logging_config_follows_settings() -> AppResult<()> {
        let config = config("http://127.0.0.1:9/api/v2", "json")?;
        let logging = logging_config(&config)?;
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);
        Ok(())
    }

    #[test]
    fn unknown_log_format_is_rejected() -> AppResult<()> {
        let config = config("http://127.0.0.1:9/api/v2", "xml")?;
        assert!(matches!(
            logging_config(&config),
            Err(AppError::InvalidConfig {
                field: "log_format",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let args = IntakeArgs::parse_from(["intake", "--tracker-list-id", "L1"]);
        assert!(matches!(
            BootstrapDependencies::from_args(args),
            Err(AppError::Config { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_tracker_still_yields_state_with_empty_cache() -> AppResult<()> {
        // Port 9 (discard) is not expected to serve HTTP.
        let config = config("http://127.0.0.1:9/api/v2", "pretty")?;
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        let tracker = HttpTaskTracker::new(&config.tracker)
            .map_err(|err| AppError::tracker("tracker.new", err))?;

        let state = build_state(config, Arc::new(tracker), telemetry).await;

        assert!(state.cache().is_empty());
        assert_eq!(state.telemetry().snapshot().option_cache_refreshes_failed, 1);
        Ok(())
    }
}
