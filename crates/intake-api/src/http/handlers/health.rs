//! Health, diagnostics and metrics endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{Json, body::Body, extract::State, http::StatusCode, response::Response};
use intake_core::CachedField;
use intake_telemetry::build_sha;
use tracing::error;

use crate::http::errors::ApiError;
use crate::models::HealthResponse;
use crate::state::ApiState;

pub(crate) async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let snapshot = state.telemetry.snapshot();
    let cached_fields = state.cache.len();
    let status = if cached_fields == 0 && snapshot.option_cache_refreshes_failed > 0 {
        "degraded"
    } else {
        "ok"
    };
    Json(HealthResponse {
        status,
        build: build_sha().to_string(),
        cached_fields,
    })
}

pub(crate) async fn debug_options(
    State(state): State<Arc<ApiState>>,
) -> Json<BTreeMap<String, CachedField>> {
    Json(state.cache.snapshot())
}

pub(crate) async fn metrics(State(state): State<Arc<ApiState>>) -> Result<Response, ApiError> {
    match state.telemetry.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )
            .body(Body::from(body))
            .map_err(|err| {
                error!(error = %err, "failed to build metrics response");
                ApiError::internal("failed to build metrics response")
            }),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            Err(ApiError::internal("failed to render metrics"))
        }
    }
}
