//! Signed guarantee: render the PDF and attach it to the task.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use base64::{Engine as _, engine::general_purpose};
use chrono::{SecondsFormat, Utc};
use intake_core::{AttachmentFile, AttachmentKind, GuaranteeDocument, render_guarantee_pdf};
use tracing::{error, info};

use crate::http::constants::PDF_MIME;
use crate::http::errors::ApiError;
use crate::http::handlers::lifecycle::require_task_id;
use crate::models::{GuaranteeRequest, GuaranteeResponse};
use crate::state::ApiState;

pub(crate) async fn submit_guarantee(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<GuaranteeRequest>, JsonRejection>,
) -> Result<Json<GuaranteeResponse>, ApiError> {
    let Json(request) = payload?;
    let task_id = require_task_id(&request.task_id)?.to_string();
    let full_name = request.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(ApiError::invalid_field("full_name", "full_name is required"));
    }
    let signature_image = request
        .signature_image
        .as_deref()
        .map(decode_signature)
        .transpose()?
        .flatten();

    let document = GuaranteeDocument {
        full_name,
        signed_at: request
            .signed_at
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        terms_text: request.terms_text,
        signature_image,
    };

    let pdf = tokio::task::spawn_blocking(move || render_guarantee_pdf(&document))
        .await
        .map_err(|err| {
            error!(error = %err, "guarantee rendering task failed");
            ApiError::internal("guarantee rendering did not complete")
        })?
        .map_err(|err| {
            error!(error = %err, detail = ?err, "guarantee rendering failed");
            ApiError::internal("guarantee document could not be rendered")
        })?;

    let attachment = state
        .attachments
        .upload(
            &task_id,
            AttachmentKind::Guarantee,
            AttachmentFile {
                bytes: pdf,
                filename: format!("guarantee-{task_id}.pdf"),
                mime: PDF_MIME.to_string(),
            },
        )
        .await;
    if let (Some(field_id), Some(url)) = (
        state.config.fields.guarantee_url.as_deref(),
        attachment.url.as_deref(),
    ) {
        state.attachments.record_url(&task_id, field_id, url).await;
    }
    info!(%task_id, uploaded = attachment.is_ok(), "guarantee processed");

    Ok(Json(GuaranteeResponse {
        task_id,
        attachment,
    }))
}

/// Decode a base64 image, accepting a `data:<mime>;base64,` prefix.
/// Blank input means no signature.
pub(crate) fn decode_signature(raw: &str) -> Result<Option<Vec<u8>>, ApiError> {
    let trimmed = raw.trim();
    let encoded = if trimmed.starts_with("data:") {
        trimmed
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| {
                ApiError::invalid_field("signature_image", "data URL carries no payload")
            })?
    } else {
        trimmed
    };
    let compact: String = encoded.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(None);
    }
    general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map(Some)
        .map_err(|err| {
            ApiError::invalid_field(
                "signature_image",
                format!("signature_image is not valid base64: {err}"),
            )
        })
}
