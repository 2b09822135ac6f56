//! Request and response bodies of the intake API.

use intake_core::{AttachmentResult, FieldAssignment};
use serde::{Deserialize, Serialize};

/// Problem document (RFC 9457) returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub kind: String,
    /// Fixed summary for the problem type.
    pub title: String,
    /// Response status code.
    pub status: u16,
    /// What went wrong for this request, including upstream status and body
    /// for tracker failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Offending request fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
}

/// One rejected request field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    /// JSON pointer to the offending field.
    pub pointer: String,
    /// Validation message.
    pub message: String,
}

/// Response to an accepted application.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    /// Created task id.
    pub task_id: String,
    /// Browser URL of the task.
    pub task_url: Option<String>,
    /// Custom-field values sent with the task.
    pub assignments: Vec<FieldAssignment>,
    /// Outcome of the video upload.
    pub video: AttachmentResult,
}

/// Cohort assignment request.
#[derive(Debug, Clone, Deserialize)]
pub struct CohortRequest {
    /// Target task.
    #[serde(default)]
    pub task_id: String,
    /// Free-text cohort name or code.
    #[serde(default)]
    pub cohort: String,
}

/// Cohort assignment result.
#[derive(Debug, Clone, Serialize)]
pub struct CohortResponse {
    /// Updated task.
    pub task_id: String,
    /// Cohort field id.
    pub field_id: String,
    /// Option written to the field.
    pub option_id: String,
    /// Matched cohort label.
    pub cohort: String,
}

/// Payment-method update request.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethodRequest {
    /// Target task.
    #[serde(default)]
    pub task_id: String,
    /// `upfront`, `installments` or `financing`.
    #[serde(default)]
    pub method: String,
}

/// Payment-method update result.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodResponse {
    /// Updated task.
    pub task_id: String,
    /// Payment-method field id.
    pub field_id: String,
    /// Option written to the field.
    pub option_id: String,
    /// Canonical method key.
    pub method: String,
}

/// Signed guarantee submission.
#[derive(Debug, Clone, Deserialize)]
pub struct GuaranteeRequest {
    /// Target task.
    #[serde(default)]
    pub task_id: String,
    /// Signer name.
    #[serde(default)]
    pub full_name: String,
    /// Signing timestamp; defaults to the time of the request.
    #[serde(default)]
    pub signed_at: Option<String>,
    /// Terms the signer agreed to.
    #[serde(default)]
    pub terms_text: String,
    /// Base64 signature image, optionally as a `data:` URL.
    #[serde(default)]
    pub signature_image: Option<String>,
}

/// Guarantee upload result.
#[derive(Debug, Clone, Serialize)]
pub struct GuaranteeResponse {
    /// Task the PDF was attached to.
    pub task_id: String,
    /// Outcome of the PDF upload.
    pub attachment: AttachmentResult,
}

/// Liveness report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the option cache could not be loaded.
    pub status: &'static str,
    /// Build identifier.
    pub build: String,
    /// Enumerated fields currently cached.
    pub cached_fields: usize,
}
