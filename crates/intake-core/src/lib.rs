#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Tracker-agnostic core of the intake service.
//!
//! Layout: `model.rs` (wire-neutral DTOs), `tracker.rs` (the [`TaskTracker`]
//! port), `cache.rs` (option cache), `resolver/` (free text to option id),
//! `payload.rs` + `application.rs` (submission to task mapping),
//! `lifecycle.rs` (cohort keywords), `attachments.rs` (upload pipeline),
//! `document.rs` (guarantee PDF).

pub mod application;
pub mod attachments;
pub mod cache;
pub mod document;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod payload;
pub mod resolver;
#[cfg(test)]
pub(crate) mod testing;
pub mod tracker;

pub use application::build_application_task;
pub use attachments::{AttachmentKind, AttachmentPipeline};
pub use cache::{CachedField, OptionCache};
pub use document::{
    GuaranteeDocument, GuaranteeLayout, format_signed_at, layout_guarantee, render_guarantee_pdf,
};
pub use error::{RenderError, TrackerError, TrackerResult};
pub use lifecycle::resolve_cohort;
pub use model::{
    AssignmentValue, AttachmentFile, AttachmentResult, CreatedTask, FieldAssignment,
    FieldDefinition, FieldOption, NewTask, UploadStatus, UploadedAttachment,
};
pub use payload::ApplicationPayload;
pub use resolver::{OptionResolver, normalize_label, push_dropdown_or_text};
pub use tracker::TaskTracker;
