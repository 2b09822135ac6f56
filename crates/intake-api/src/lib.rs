#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! HTTP surface of the intake service.
//!
//! Layout: `http/` (router, middleware, problem responses and handlers),
//! `state.rs` (shared handles), `models.rs` (request and response bodies).

pub mod http;
pub mod models;
pub mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use http::router::ApiServer;
pub use state::ApiState;
