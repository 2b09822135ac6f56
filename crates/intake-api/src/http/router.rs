//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, Method, Request, header::CONTENT_TYPE},
    middleware,
    routing::{get, post},
};
use intake_telemetry::build_sha;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::http::constants::{
    HEADER_REQUEST_ID, JSON_BODY_LIMIT_BYTES, SUBMISSION_OVERHEAD_BYTES,
};
use crate::http::deadline::{enforce_deadline, panic_response};
use crate::http::handlers::applications::submit_application;
use crate::http::handlers::guarantee::submit_guarantee;
use crate::http::handlers::health::{debug_options, health, metrics};
use crate::http::handlers::lifecycle::{assign_cohort, set_payment_method};
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

/// Axum router wrapper that hosts the intake API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build the router around shared state.
    #[must_use]
    pub fn new(state: Arc<ApiState>) -> Self {
        let deadline = state.config.server.request_deadline;
        let submission_limit = state
            .config
            .server
            .max_video_bytes
            .saturating_add(SUBMISSION_OVERHEAD_BYTES);
        let telemetry = state.telemetry.clone();

        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, HeaderName::from_static(HEADER_REQUEST_ID)]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let method = request.method().clone();
                let uri_path = request.uri().path();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %method,
                    route = %uri_path,
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(intake_telemetry::set_request_id_layer())
            .layer(intake_telemetry::propagate_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let router = Self::build_router(submission_limit)
            .route_layer(CatchPanicLayer::custom(panic_response))
            .route_layer(middleware::from_fn_with_state(deadline, enforce_deadline))
            .route_layer(layered)
            .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT_BYTES))
            .layer(cors_layer)
            .with_state(state);

        Self { router }
    }

    /// Routes; the submission route overrides the JSON body limit.
    fn build_router(submission_limit: usize) -> Router<Arc<ApiState>> {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route("/debug/options", get(debug_options))
            .route(
                "/api/applications",
                post(submit_application).layer(DefaultBodyLimit::max(submission_limit)),
            )
            .route("/api/applications/cohort", post(assign_cohort))
            .route("/api/applications/payment-method", post(set_payment_method))
            .route("/api/applications/guarantee", post(submit_guarantee))
    }

    /// Serve the API using the configured router on the supplied address.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        tracing::info!("Starting intake API on {}", addr);
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router.into_make_service()).await?;
        Ok(())
    }

    /// Underlying router, for in-process requests.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }
}
