//! Blanket request deadline and panic-to-problem conversion.

use std::any::Any;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use intake_telemetry::{current_request_id, current_route};
use tracing::{error, warn};

use crate::http::errors::ApiError;

/// Abort the request with `503` once `deadline` elapses. The in-flight
/// handler future is dropped.
pub(crate) async fn enforce_deadline(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let route = current_route().unwrap_or_else(|| request.uri().path().to_string());
    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(%route, deadline_secs = deadline.as_secs(), "request deadline exceeded");
            ApiError::service_unavailable(format!(
                "request did not complete within {} seconds",
                deadline.as_secs()
            ))
            .into_response()
        }
    }
}

/// Convert a handler panic into a `500` problem response.
pub(crate) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(
        panic = %message,
        route = %current_route().unwrap_or_default(),
        request_id = %current_request_id().unwrap_or_default(),
        "handler panicked"
    );
    ApiError::internal("the request could not be completed").into_response()
}
