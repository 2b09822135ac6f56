#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! `reqwest` implementation of the [`intake_core::TaskTracker`] port.
//!
//! Layout: `client.rs` (HTTP calls and status mapping), `wire.rs` (request
//! and response bodies of the remote API).

pub mod client;
mod wire;

pub use client::HttpTaskTracker;
