//! In-memory tracker and state builders for handler tests.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use intake_config::{
    CohortCatalog, CohortOption, FieldMap, IntakeConfig, PaymentCatalog, ServerSettings,
    TrackerSettings,
};
use intake_core::{
    AttachmentFile, CreatedTask, FieldDefinition, FieldOption, NewTask, OptionCache, TaskTracker,
    TrackerError, TrackerResult, UploadedAttachment,
};
use intake_telemetry::Metrics;

use crate::state::ApiState;

#[derive(Default)]
struct Recorded {
    calls: usize,
    created: Vec<NewTask>,
    updates: Vec<(String, String, String)>,
    uploads: Vec<(String, String, String)>,
}

/// Tracker double recording every call.
pub(crate) struct MemoryTracker {
    fields: Vec<FieldDefinition>,
    upload_failure: Option<u16>,
    create_failure: Option<u16>,
    recorded: Mutex<Recorded>,
}

impl MemoryTracker {
    pub(crate) fn new(fields: Vec<FieldDefinition>) -> Self {
        Self {
            fields,
            upload_failure: None,
            create_failure: None,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    pub(crate) const fn failing_uploads(mut self, status: u16) -> Self {
        self.upload_failure = Some(status);
        self
    }

    pub(crate) const fn failing_creates(mut self, status: u16) -> Self {
        self.create_failure = Some(status);
        self
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn calls(&self) -> usize {
        self.recorded().calls
    }

    pub(crate) fn created(&self) -> Vec<NewTask> {
        self.recorded().created.clone()
    }

    pub(crate) fn updates(&self) -> Vec<(String, String, String)> {
        self.recorded().updates.clone()
    }

    pub(crate) fn uploads(&self) -> Vec<(String, String, String)> {
        self.recorded().uploads.clone()
    }
}

#[async_trait]
impl TaskTracker for MemoryTracker {
    async fn list_fields(&self) -> TrackerResult<Vec<FieldDefinition>> {
        self.recorded().calls += 1;
        Ok(self.fields.clone())
    }

    async fn create_task(&self, task: &NewTask) -> TrackerResult<CreatedTask> {
        let mut recorded = self.recorded();
        recorded.calls += 1;
        if let Some(status) = self.create_failure {
            return Err(TrackerError::Status {
                operation: "create_task",
                status,
                body: "{\"err\":\"Team not authorized\"}".to_string(),
            });
        }
        recorded.created.push(task.clone());
        let id = format!("task-{}", recorded.created.len());
        Ok(CreatedTask {
            url: Some(format!("https://tracker.example/t/{id}")),
            id,
        })
    }

    async fn set_field(&self, task_id: &str, field_id: &str, value: &str) -> TrackerResult<()> {
        let mut recorded = self.recorded();
        recorded.calls += 1;
        recorded
            .updates
            .push((task_id.to_string(), field_id.to_string(), value.to_string()));
        Ok(())
    }

    async fn upload_attachment(
        &self,
        task_id: &str,
        file: AttachmentFile,
    ) -> TrackerResult<UploadedAttachment> {
        let mut recorded = self.recorded();
        recorded.calls += 1;
        recorded
            .uploads
            .push((task_id.to_string(), file.filename.clone(), file.mime.clone()));
        if let Some(status) = self.upload_failure {
            return Err(TrackerError::Status {
                operation: "upload_attachment",
                status,
                body: "internal error".to_string(),
            });
        }
        Ok(UploadedAttachment {
            id: Some("att-1".to_string()),
            url: Some(format!("https://files.example/{}", file.filename)),
        })
    }
}

pub(crate) fn dropdown(id: &str, name: &str, options: &[(&str, &str)]) -> FieldDefinition {
    FieldDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind: "drop_down".to_string(),
        options: options
            .iter()
            .map(|(id, name)| FieldOption {
                id: (*id).to_string(),
                name: (*name).to_string(),
            })
            .collect(),
    }
}

pub(crate) fn config() -> IntakeConfig {
    IntakeConfig {
        server: ServerSettings {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
            request_deadline: Duration::from_secs(30),
            max_video_bytes: 1024 * 1024,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        },
        tracker: TrackerSettings {
            base_url: "https://tracker.example/api/v2"
                .parse::<url::Url>()
                .unwrap_or_else(|err| panic!("static url: {err}")),
            token: "pk_test".to_string(),
            list_id: "L1".to_string(),
            timeout: Duration::from_secs(5),
        },
        fields: FieldMap {
            email: Some("cf-email".to_string()),
            education: Some("cf-edu".to_string()),
            work_eligibility: Some("cf-elig".to_string()),
            video_url: Some("cf-video".to_string()),
            guarantee_url: Some("cf-guarantee".to_string()),
            cohort: "cf-cohort".to_string(),
            payment_method: "cf-pay".to_string(),
            ..FieldMap::default()
        },
        cohorts: CohortCatalog {
            options: [
                CohortOption {
                    label: "October".to_string(),
                    keywords: vec!["DTCA-2502".to_string(), "october".to_string()],
                    option_id: "opt-oct".to_string(),
                },
                CohortOption {
                    label: "January".to_string(),
                    keywords: vec!["DTCA-2601".to_string(), "january".to_string()],
                    option_id: "opt-jan".to_string(),
                },
            ],
        },
        payments: PaymentCatalog {
            upfront: "pay-up".to_string(),
            installments: "pay-inst".to_string(),
            financing: "pay-fin".to_string(),
        },
    }
}

pub(crate) fn state_with(tracker: Arc<MemoryTracker>) -> Arc<ApiState> {
    let metrics = Metrics::new().unwrap_or_else(|err| panic!("metrics registry: {err}"));
    let cache = Arc::new(OptionCache::new(metrics.clone()));
    Arc::new(ApiState::new(Arc::new(config()), tracker, cache, metrics))
}
