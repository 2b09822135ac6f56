//! HTTP surface modules (router, middleware, handlers).

/// Shared constants and header names.
pub mod constants;
/// Per-request deadline and panic recovery middleware.
pub mod deadline;
/// Problem response helpers and error types.
pub mod errors;
/// Route handlers.
pub mod handlers;
/// Router construction and server host.
pub mod router;
/// Metrics middleware for HTTP requests.
pub mod telemetry;
