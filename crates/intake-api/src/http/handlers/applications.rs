//! Application submission endpoint.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use intake_core::{
    ApplicationPayload, AttachmentFile, AttachmentKind, AttachmentResult, build_application_task,
};
use intake_telemetry::current_request_id;
use tracing::info;

use crate::http::constants::{VIDEO_MIME_PREFIX, VIDEO_PART};
use crate::http::errors::ApiError;
use crate::models::ApplicationResponse;
use crate::state::ApiState;

/// Text answers plus the applicant video, read in full before any remote call.
#[derive(Debug)]
pub(crate) struct Submission {
    pub(crate) payload: ApplicationPayload,
    pub(crate) video: AttachmentFile,
}

pub(crate) async fn submit_application(
    State(state): State<Arc<ApiState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationResponse>), ApiError> {
    let submission = read_submission(multipart, state.config.server.max_video_bytes).await?;
    let response = process_submission(&state, submission).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Split the multipart body into text answers and the video part.
///
/// # Errors
///
/// Returns a 400 naming `video` when the part is missing, empty or not a
/// `video/*` upload, a 413 once the video passes `max_video_bytes`, and a
/// 400/413 for malformed or oversized bodies.
pub(crate) async fn read_submission(
    mut multipart: Multipart,
    max_video_bytes: usize,
) -> Result<Submission, ApiError> {
    let mut payload = ApplicationPayload::default();
    let mut video = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name.eq_ignore_ascii_case(VIDEO_PART) {
            let filename = field
                .file_name()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or("application-video")
                .to_string();
            let mime = field.content_type().unwrap_or_default().to_ascii_lowercase();
            let mut bytes = Vec::new();
            while let Some(chunk) = field.chunk().await? {
                if bytes.len().saturating_add(chunk.len()) > max_video_bytes {
                    return Err(ApiError::payload_too_large(format!(
                        "video exceeds the {max_video_bytes} byte limit"
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }
            video = Some((filename, mime, bytes));
        } else if field.file_name().is_none() {
            let value = field.text().await?;
            payload.insert(&name, &value);
        }
    }

    let Some((filename, mime, bytes)) = video else {
        return Err(ApiError::invalid_field(
            VIDEO_PART,
            "a video file is required",
        ));
    };
    if !mime.starts_with(VIDEO_MIME_PREFIX) {
        return Err(ApiError::invalid_field(
            VIDEO_PART,
            format!("video must be uploaded with a video/* content type, got '{mime}'"),
        ));
    }
    if bytes.is_empty() {
        return Err(ApiError::invalid_field(VIDEO_PART, "video file is empty"));
    }

    Ok(Submission {
        payload,
        video: AttachmentFile {
            bytes,
            filename,
            mime,
        },
    })
}

/// Create the task, upload the video and record its URL.
///
/// # Errors
///
/// Returns a 502 when the task cannot be created. Upload failures are
/// embedded in the response.
pub(crate) async fn process_submission(
    state: &ApiState,
    submission: Submission,
) -> Result<ApplicationResponse, ApiError> {
    state.cache.refresh(state.tracker.as_ref()).await;

    let task = build_application_task(&submission.payload, &state.config.fields, &state.resolver);
    let created = state.tracker.create_task(&task).await?;
    info!(
        task_id = %created.id,
        request_id = %current_request_id().unwrap_or_default(),
        assignments = task.assignments.len(),
        "application task created"
    );

    let video: AttachmentResult = state
        .attachments
        .upload(&created.id, AttachmentKind::Video, submission.video)
        .await;
    if let (Some(field_id), Some(url)) = (state.config.fields.video_url.as_deref(), video.url.as_deref())
    {
        state.attachments.record_url(&created.id, field_id, url).await;
    }

    Ok(ApplicationResponse {
        task_id: created.id,
        task_url: created.url,
        assignments: task.assignments,
        video,
    })
}
