//! Upload of binary payloads onto tracker tasks.

use std::sync::Arc;

use intake_telemetry::Metrics;
use tracing::{info, warn};

use crate::error::TrackerError;
use crate::model::{AttachmentFile, AttachmentResult};
use crate::tracker::TaskTracker;

/// Payload kinds pushed through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Applicant video from the application form.
    Video,
    /// Rendered guarantee PDF.
    Guarantee,
}

impl AttachmentKind {
    /// Metric and log label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Guarantee => "guarantee",
        }
    }
}

/// Uploads attachments and records their URLs. Never fails the caller.
#[derive(Clone)]
pub struct AttachmentPipeline {
    tracker: Arc<dyn TaskTracker>,
    metrics: Metrics,
}

impl AttachmentPipeline {
    /// Pipeline over `tracker`.
    #[must_use]
    pub fn new(tracker: Arc<dyn TaskTracker>, metrics: Metrics) -> Self {
        Self { tracker, metrics }
    }

    /// Upload `file` to `task_id`. One attempt; failures are embedded in the
    /// result.
    pub async fn upload(
        &self,
        task_id: &str,
        kind: AttachmentKind,
        file: AttachmentFile,
    ) -> AttachmentResult {
        let filename = file.filename.clone();
        let size = file.bytes.len();
        match self.tracker.upload_attachment(task_id, file).await {
            Ok(uploaded) => {
                info!(task_id, kind = kind.as_str(), %filename, size, "attachment uploaded");
                self.metrics.inc_attachment_upload(kind.as_str(), "ok");
                AttachmentResult::uploaded(uploaded)
            }
            Err(err) => {
                let reason = failure_reason(&err);
                warn!(task_id, kind = kind.as_str(), %filename, %reason, "attachment upload failed");
                self.metrics.inc_attachment_upload(kind.as_str(), "failed");
                AttachmentResult::failed(reason)
            }
        }
    }

    /// Best-effort write of an attachment URL into a task field.
    pub async fn record_url(&self, task_id: &str, field_id: &str, url: &str) {
        if let Err(err) = self.tracker.set_field(task_id, field_id, url).await {
            warn!(
                task_id,
                field_id,
                error = %err,
                detail = %err.detail(),
                "failed to record attachment url"
            );
        }
    }
}

fn failure_reason(err: &TrackerError) -> String {
    match err {
        TrackerError::Status { status, body, .. } => format!("{status}: {}", body.trim()),
        TrackerError::Transport { source, .. } | TrackerError::Decode { source, .. } => {
            source.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UploadStatus;
    use crate::testing::StubTracker;

    fn video() -> AttachmentFile {
        AttachmentFile {
            bytes: vec![1, 2, 3],
            filename: "intro.mp4".into(),
            mime: "video/mp4".into(),
        }
    }

    #[tokio::test]
    async fn successful_upload_reports_remote_url() -> anyhow::Result<()> {
        let tracker = Arc::new(StubTracker::with_fields(Vec::new()));
        let metrics = Metrics::new()?;
        let pipeline = AttachmentPipeline::new(tracker.clone(), metrics.clone());

        let result = pipeline.upload("task-1", AttachmentKind::Video, video()).await;

        assert!(result.is_ok());
        assert_eq!(result.remote_id.as_deref(), Some("att-1"));
        assert_eq!(
            result.url.as_deref(),
            Some("https://files.example/att-1/intro.mp4")
        );
        assert_eq!(
            tracker.uploads(),
            vec![(
                "task-1".to_string(),
                "intro.mp4".to_string(),
                "video/mp4".to_string(),
                3
            )]
        );
        assert_eq!(metrics.snapshot().attachment_uploads_failed, 0);
        Ok(())
    }

    #[tokio::test]
    async fn rejected_upload_is_embedded_not_raised() -> anyhow::Result<()> {
        let tracker = Arc::new(StubTracker::with_fields(Vec::new()));
        tracker.fail_uploads(500);
        let metrics = Metrics::new()?;
        let pipeline = AttachmentPipeline::new(tracker, metrics.clone());

        let result = pipeline
            .upload("task-1", AttachmentKind::Guarantee, video())
            .await;

        assert_eq!(
            result.upload_status,
            UploadStatus::Failed("500: storage offline".into())
        );
        assert!(result.url.is_none());
        assert_eq!(metrics.snapshot().attachment_uploads_failed, 1);
        Ok(())
    }

    #[tokio::test]
    async fn record_url_swallows_failures() -> anyhow::Result<()> {
        let tracker = Arc::new(StubTracker::with_fields(Vec::new()));
        let pipeline = AttachmentPipeline::new(tracker.clone(), Metrics::new()?);

        pipeline.record_url("task-1", "cf-video", "https://x/1").await;
        tracker.fail_field_updates(400);
        pipeline.record_url("task-1", "cf-video", "https://x/2").await;

        assert_eq!(
            tracker.updates(),
            vec![(
                "task-1".to_string(),
                "cf-video".to_string(),
                "https://x/1".to_string()
            )]
        );
        Ok(())
    }
}
