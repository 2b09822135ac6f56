//! Port implemented by task tracker adapters.

use async_trait::async_trait;

use crate::error::TrackerResult;
use crate::model::{AttachmentFile, CreatedTask, FieldDefinition, NewTask, UploadedAttachment};

/// Remote task-tracking system the intake flows write into.
///
/// Every method is a single remote call; implementations must not retry.
#[async_trait]
pub trait TaskTracker: Send + Sync {
    /// Fetch the custom field definitions of the configured list.
    async fn list_fields(&self) -> TrackerResult<Vec<FieldDefinition>>;

    /// Create a task in the configured list.
    async fn create_task(&self, task: &NewTask) -> TrackerResult<CreatedTask>;

    /// Set one custom field on an existing task.
    async fn set_field(&self, task_id: &str, field_id: &str, value: &str) -> TrackerResult<()>;

    /// Upload a binary attachment to an existing task.
    async fn upload_attachment(
        &self,
        task_id: &str,
        file: AttachmentFile,
    ) -> TrackerResult<UploadedAttachment>;
}
