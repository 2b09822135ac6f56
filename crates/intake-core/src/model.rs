//! Tracker-neutral data model shared by the core and its adapters.

use serde::{Deserialize, Serialize};

/// One selectable value of an enumerated tracker field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Opaque option identifier required when setting the field.
    pub id: String,
    /// Display name shown in the tracker.
    pub name: String,
}

/// Custom field definition as reported by the tracker's field listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tracker field type (`drop_down`, `labels`, `short_text`, ...).
    pub kind: String,
    /// Options for enumerated fields, in tracker order; empty otherwise.
    pub options: Vec<FieldOption>,
}

impl FieldDefinition {
    /// Whether the field restricts values to a fixed option set.
    #[must_use]
    pub fn is_enumerated(&self) -> bool {
        matches!(self.kind.as_str(), "drop_down" | "labels") && !self.options.is_empty()
    }

    /// Whether the field takes a list of option ids (`labels`) rather than
    /// a single one.
    #[must_use]
    pub fn is_multi_select(&self) -> bool {
        self.kind == "labels"
    }
}

/// Value destined for a task custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AssignmentValue {
    /// Free text accepted verbatim.
    Text(String),
    /// Resolved option identifier of an enumerated field.
    Option(String),
    /// Resolved option identifiers of a multi-select (`labels`) field.
    Labels(Vec<String>),
}

/// One entry of a task's custom-field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldAssignment {
    /// Target field identifier.
    pub field_id: String,
    /// Value for the field.
    pub value: AssignmentValue,
}

/// Task to create in the configured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    /// Task title.
    pub name: String,
    /// Markdown description.
    pub description: String,
    /// Custom-field values.
    pub assignments: Vec<FieldAssignment>,
}

/// Task returned by the tracker after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTask {
    /// Task identifier.
    pub id: String,
    /// Browser URL of the task, when reported.
    pub url: Option<String>,
}

/// Binary payload destined for a task attachment.
#[derive(Clone)]
pub struct AttachmentFile {
    /// File contents.
    pub bytes: Vec<u8>,
    /// File name presented to the tracker.
    pub filename: String,
    /// MIME type of the contents.
    pub mime: String,
}

impl std::fmt::Debug for AttachmentFile {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AttachmentFile")
            .field("bytes", &self.bytes.len())
            .field("filename", &self.filename)
            .field("mime", &self.mime)
            .finish()
    }
}

/// Attachment as reported by the tracker after upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAttachment {
    /// Attachment identifier.
    pub id: Option<String>,
    /// Download URL.
    pub url: Option<String>,
}

/// Outcome of a single upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum UploadStatus {
    /// The tracker accepted the upload.
    Ok,
    /// The upload failed; the reason embeds the upstream status and body.
    Failed(String),
}

/// Result of pushing one binary payload through the attachment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentResult {
    /// Attachment identifier assigned by the tracker.
    pub remote_id: Option<String>,
    /// Attachment URL assigned by the tracker.
    pub url: Option<String>,
    /// Upload outcome.
    pub upload_status: UploadStatus,
}

impl AttachmentResult {
    /// Successful upload.
    #[must_use]
    pub fn uploaded(attachment: UploadedAttachment) -> Self {
        Self {
            remote_id: attachment.id,
            url: attachment.url,
            upload_status: UploadStatus::Ok,
        }
    }

    /// Failed upload with a reason.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            remote_id: None,
            url: None,
            upload_status: UploadStatus::Failed(reason.into()),
        }
    }

    /// Whether the upload succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.upload_status, UploadStatus::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_status_serializes_with_reason() -> anyhow::Result<()> {
        let failed = AttachmentResult::failed("500: boom");
        assert_eq!(
            serde_json::to_value(&failed)?,
            json!({
                "remote_id": null,
                "url": null,
                "upload_status": {"status": "failed", "reason": "500: boom"}
            })
        );
        let ok = AttachmentResult::uploaded(UploadedAttachment {
            id: Some("att-1".into()),
            url: Some("https://files/att-1".into()),
        });
        assert!(ok.is_ok());
        assert_eq!(
            serde_json::to_value(&ok)?["upload_status"],
            json!({"status": "ok"})
        );
        Ok(())
    }

    #[test]
    fn only_dropdown_like_fields_with_options_are_enumerated() {
        let mut field = FieldDefinition {
            id: "cf-1".into(),
            name: "Education".into(),
            kind: "drop_down".into(),
            options: vec![FieldOption {
                id: "o1".into(),
                name: "Bachelor".into(),
            }],
        };
        assert!(field.is_enumerated());
        field.kind = "short_text".into();
        assert!(!field.is_enumerated());
        field.kind = "labels".into();
        field.options.clear();
        assert!(!field.is_enumerated());
    }

    #[test]
    fn attachment_debug_hides_bytes() {
        let file = AttachmentFile {
            bytes: vec![0; 4],
            filename: "a.mp4".into(),
            mime: "video/mp4".into(),
        };
        assert!(format!("{file:?}").contains("bytes: 4"));
    }
}
