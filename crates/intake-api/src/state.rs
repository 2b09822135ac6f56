//! Shared handles passed to every handler.

use std::sync::Arc;

use intake_config::IntakeConfig;
use intake_core::{AttachmentPipeline, OptionCache, OptionResolver, TaskTracker};
use intake_telemetry::Metrics;

/// Application state shared across requests.
pub struct ApiState {
    pub(crate) config: Arc<IntakeConfig>,
    pub(crate) tracker: Arc<dyn TaskTracker>,
    pub(crate) cache: Arc<OptionCache>,
    pub(crate) resolver: OptionResolver,
    pub(crate) attachments: AttachmentPipeline,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    /// Wire the resolver and attachment pipeline around `tracker` and `cache`.
    #[must_use]
    pub fn new(
        config: Arc<IntakeConfig>,
        tracker: Arc<dyn TaskTracker>,
        cache: Arc<OptionCache>,
        telemetry: Metrics,
    ) -> Self {
        let resolver = OptionResolver::new(
            Arc::clone(&cache),
            config.fields.work_eligibility.as_deref(),
            telemetry.clone(),
        );
        let attachments = AttachmentPipeline::new(Arc::clone(&tracker), telemetry.clone());
        Self {
            config,
            tracker,
            cache,
            resolver,
            attachments,
            telemetry,
        }
    }

    /// Validated service configuration.
    #[must_use]
    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Shared option cache.
    #[must_use]
    pub fn cache(&self) -> &OptionCache {
        &self.cache
    }

    /// Metrics handle shared with the HTTP layer.
    #[must_use]
    pub const fn telemetry(&self) -> &Metrics {
        &self.telemetry
    }
}
