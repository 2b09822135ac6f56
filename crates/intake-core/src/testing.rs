//! In-memory tracker double shared by the unit tests of this crate.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{TrackerError, TrackerResult};
use crate::model::{
    AttachmentFile, CreatedTask, FieldDefinition, FieldOption, NewTask, UploadedAttachment,
};
use crate::tracker::TaskTracker;

#[derive(Default)]
struct StubState {
    fields: Vec<FieldDefinition>,
    listing_status: Option<u16>,
    upload_status: Option<u16>,
    set_field_status: Option<u16>,
    uploads: Vec<(String, String, String, usize)>,
    updates: Vec<(String, String, String)>,
    created: Vec<NewTask>,
}

pub(crate) struct StubTracker {
    state: Mutex<StubState>,
}

impl StubTracker {
    pub(crate) fn with_fields(fields: Vec<FieldDefinition>) -> Self {
        Self {
            state: Mutex::new(StubState {
                fields,
                ..StubState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_fields(&self, fields: Vec<FieldDefinition>) {
        let mut state = self.state();
        state.fields = fields;
        state.listing_status = None;
    }

    pub(crate) fn fail_listing(&self, status: u16) {
        self.state().listing_status = Some(status);
    }

    pub(crate) fn fail_uploads(&self, status: u16) {
        self.state().upload_status = Some(status);
    }

    pub(crate) fn fail_field_updates(&self, status: u16) {
        self.state().set_field_status = Some(status);
    }

    pub(crate) fn uploads(&self) -> Vec<(String, String, String, usize)> {
        self.state().uploads.clone()
    }

    pub(crate) fn updates(&self) -> Vec<(String, String, String)> {
        self.state().updates.clone()
    }
}

#[async_trait]
impl TaskTracker for StubTracker {
    async fn list_fields(&self) -> TrackerResult<Vec<FieldDefinition>> {
        let state = self.state();
        match state.listing_status {
            Some(status) => Err(TrackerError::Status {
                operation: "list_fields",
                status,
                body: "listing unavailable".to_string(),
            }),
            None => Ok(state.fields.clone()),
        }
    }

    async fn create_task(&self, task: &NewTask) -> TrackerResult<CreatedTask> {
        let mut state = self.state();
        state.created.push(task.clone());
        Ok(CreatedTask {
            id: format!("task-{}", state.created.len()),
            url: None,
        })
    }

    async fn set_field(&self, task_id: &str, field_id: &str, value: &str) -> TrackerResult<()> {
        let mut state = self.state();
        if let Some(status) = state.set_field_status {
            return Err(TrackerError::Status {
                operation: "set_field",
                status,
                body: "update rejected".to_string(),
            });
        }
        state
            .updates
            .push((task_id.to_string(), field_id.to_string(), value.to_string()));
        Ok(())
    }

    async fn upload_attachment(
        &self,
        task_id: &str,
        file: AttachmentFile,
    ) -> TrackerResult<UploadedAttachment> {
        let mut state = self.state();
        state.uploads.push((
            task_id.to_string(),
            file.filename.clone(),
            file.mime.clone(),
            file.bytes.len(),
        ));
        if let Some(status) = state.upload_status {
            return Err(TrackerError::Status {
                operation: "upload_attachment",
                status,
                body: "storage offline".to_string(),
            });
        }
        let index = state.uploads.len();
        Ok(UploadedAttachment {
            id: Some(format!("att-{index}")),
            url: Some(format!("https://files.example/att-{index}/{}", file.filename)),
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

pub(crate) fn text_field(id: &str, name: &str) -> FieldDefinition {
    FieldDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind: "short_text".to_string(),
        options: Vec::new(),
    }
}
