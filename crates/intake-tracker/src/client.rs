//! HTTP client for the task tracker.

use async_trait::async_trait;
use intake_config::TrackerSettings;
use intake_core::{
    AttachmentFile, CreatedTask, FieldDefinition, NewTask, TaskTracker, TrackerError,
    TrackerResult, UploadedAttachment,
};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::wire::{
    AttachmentResponse, CreateTaskRequest, FieldsResponse, SetFieldRequest, TaskResponse,
};

const ATTACHMENT_PART: &str = "attachment";

/// Task tracker backed by its REST API.
#[derive(Clone)]
pub struct HttpTaskTracker {
    client: Client,
    base_url: Url,
    token: String,
    list_id: String,
}

impl HttpTaskTracker {
    /// Build a client honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(settings: &TrackerSettings) -> TrackerResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| TrackerError::Transport {
                operation: "build_client",
                source: Box::new(err),
            })?;
        Ok(Self::with_client(client, settings))
    }

    /// Use an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client, settings: &TrackerSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.clone(),
            token: settings.token.clone(),
            list_id: settings.list_id.clone(),
        }
    }

    fn endpoint(&self, operation: &'static str, segments: &[&str]) -> TrackerResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TrackerError::Transport {
                operation,
                source: "tracker base URL cannot carry a path".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, &self.token)
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> TrackerResult<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|err| TrackerError::Transport {
                operation,
                source: Box::new(err),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(operation, status = status.as_u16(), "tracker call succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = status.as_u16(), %body, "tracker call rejected");
        Err(TrackerError::Status {
            operation,
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> TrackerResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|err| TrackerError::Transport {
                operation,
                source: Box::new(err),
            })?;
        serde_json::from_slice(&bytes).map_err(|err| TrackerError::Decode {
            operation,
            source: Box::new(err),
        })
    }
}

#[async_trait]
impl TaskTracker for HttpTaskTracker {
    async fn list_fields(&self) -> TrackerResult<Vec<FieldDefinition>> {
        const OP: &str = "list_fields";
        let url = self.endpoint(OP, &["list", self.list_id.as_str(), "field"])?;
        let response = self.send(OP, self.client.get(url)).await?;
        let listing: FieldsResponse = Self::decode(OP, response).await?;
        Ok(listing.fields.into_iter().map(FieldDefinition::from).collect())
    }

    async fn create_task(&self, task: &NewTask) -> TrackerResult<CreatedTask> {
        const OP: &str = "create_task";
        let url = self.endpoint(OP, &["list", self.list_id.as_str(), "task"])?;
        let body = CreateTaskRequest::from(task);
        let response = self.send(OP, self.client.post(url).json(&body)).await?;
        let created: TaskResponse = Self::decode(OP, response).await?;
        Ok(created.into())
    }

    async fn set_field(&self, task_id: &str, field_id: &str, value: &str) -> TrackerResult<()> {
        const OP: &str = "set_field";
        let url = self.endpoint(OP, &["task", task_id, "field", field_id])?;
        self.send(OP, self.client.post(url).json(&SetFieldRequest { value }))
            .await?;
        Ok(())
    }

    async fn upload_attachment(
        &self,
        task_id: &str,
        file: AttachmentFile,
    ) -> TrackerResult<UploadedAttachment> {
        const OP: &str = "upload_attachment";
        let url = self.endpoint(OP, &["task", task_id, "attachment"])?;
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&file.mime)
            .map_err(|err| TrackerError::Transport {
                operation: OP,
                source: Box::new(err),
            })?;
        let form = Form::new().part(ATTACHMENT_PART, part);
        let response = self.send(OP, self.client.post(url).multipart(form)).await?;
        // an empty body still counts as a successful upload
        let bytes = response.bytes().await.map_err(|err| TrackerError::Transport {
            operation: OP,
            source: Box::new(err),
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(AttachmentResponse::default().into());
        }
        let attachment: AttachmentResponse =
            serde_json::from_slice(&bytes).map_err(|err| TrackerError::Decode {
                operation: OP,
                source: Box::new(err),
            })?;
        Ok(attachment.into())
    }
}
