//! Cohort and payment-method updates on an existing task.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use intake_config::PaymentMethod;
use intake_core::resolve_cohort;
use tracing::info;

use crate::http::errors::ApiError;
use crate::models::{CohortRequest, CohortResponse, PaymentMethodRequest, PaymentMethodResponse};
use crate::state::ApiState;

pub(crate) async fn assign_cohort(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CohortRequest>, JsonRejection>,
) -> Result<Json<CohortResponse>, ApiError> {
    let Json(request) = payload?;
    let task_id = require_task_id(&request.task_id)?;

    let cohort = resolve_cohort(&state.config.cohorts, &request.cohort).ok_or_else(|| {
        ApiError::invalid_field(
            "cohort",
            format!("'{}' does not name a known cohort", request.cohort.trim()),
        )
    })?;

    let field_id = &state.config.fields.cohort;
    state
        .tracker
        .set_field(task_id, field_id, &cohort.option_id)
        .await?;
    info!(task_id, cohort = %cohort.label, "cohort assigned");

    Ok(Json(CohortResponse {
        task_id: task_id.to_string(),
        field_id: field_id.clone(),
        option_id: cohort.option_id.clone(),
        cohort: cohort.label.clone(),
    }))
}

pub(crate) async fn set_payment_method(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<PaymentMethodRequest>, JsonRejection>,
) -> Result<Json<PaymentMethodResponse>, ApiError> {
    let Json(request) = payload?;
    let task_id = require_task_id(&request.task_id)?;

    let method: PaymentMethod = request.method.parse().map_err(|_| {
        ApiError::invalid_field(
            "method",
            "method must be one of upfront, installments, financing",
        )
    })?;

    let field_id = &state.config.fields.payment_method;
    let option_id = state.config.payments.option_id(method);
    state.tracker.set_field(task_id, field_id, option_id).await?;
    info!(task_id, %method, "payment method recorded");

    Ok(Json(PaymentMethodResponse {
        task_id: task_id.to_string(),
        field_id: field_id.clone(),
        option_id: option_id.to_string(),
        method: method.as_str().to_string(),
    }))
}

pub(crate) fn require_task_id(raw: &str) -> Result<&str, ApiError> {
    let task_id = raw.trim();
    if task_id.is_empty() {
        return Err(ApiError::invalid_field("task_id", "task_id is required"));
    }
    Ok(task_id)
}
