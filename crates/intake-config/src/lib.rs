#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Typed configuration for the intake service.
//!
//! Layout: `args.rs` (clap surface with `INTAKE_*` env fallbacks),
//! `model.rs` (validated configuration and field-id mapping), `error.rs`.

pub mod args;
pub mod error;
pub mod model;

pub use args::IntakeArgs;
pub use error::{ConfigError, ConfigResult};
pub use model::{
    ApplicantField, CohortCatalog, CohortOption, FieldMap, IntakeConfig, PaymentCatalog,
    PaymentMethod, ServerSettings, TrackerSettings,
};
