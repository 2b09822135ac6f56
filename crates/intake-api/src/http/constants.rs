//! Shared HTTP constants (headers, problem URIs, limits).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const PROBLEM_INTERNAL: &str = "https://intake.dev/problems/internal";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://intake.dev/problems/bad-request";
pub(crate) const PROBLEM_BAD_GATEWAY: &str = "https://intake.dev/problems/bad-gateway";
pub(crate) const PROBLEM_PAYLOAD_TOO_LARGE: &str = "https://intake.dev/problems/payload-too-large";
pub(crate) const PROBLEM_SERVICE_UNAVAILABLE: &str =
    "https://intake.dev/problems/service-unavailable";

/// Room left on top of the video cap for text answers and part headers.
pub(crate) const SUBMISSION_OVERHEAD_BYTES: usize = 1024 * 1024;
/// Body limit for the JSON routes; fits a base64 signature image.
pub(crate) const JSON_BODY_LIMIT_BYTES: usize = 8 * 1024 * 1024;
pub(crate) const VIDEO_PART: &str = "video";
pub(crate) const VIDEO_MIME_PREFIX: &str = "video/";
pub(crate) const PDF_MIME: &str = "application/pdf";
