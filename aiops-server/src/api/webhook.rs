//! Webhook API Handler
//!
//! Inbound alert endpoint for monitoring systems (Zabbix-style). A valid
//! API key is required; the named pipeline runs synchronously against the
//! alerting host and the step results come back with the 202.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use aiops_core::dto::pipeline::RunOutcome;
use aiops_core::dto::webhook::WebhookAlert;

use crate::api::AppState;
use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, ApiResult};
use crate::service::run_service;

/// POST /webhook/alert
/// Trigger a remediation pipeline for a monitoring alert
///
/// Malformed or incomplete payloads answer 400, not the extractor's
/// default 422; monitoring senders only distinguish 4xx classes.
pub async fn receive_alert(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<WebhookAlert>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RunOutcome>)> {
    let Json(alert) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    tracing::info!(
        "Alert '{}' for host '{}' received from user '{}', pipeline {}",
        alert.trigger_name,
        alert.hostname,
        user.username,
        alert.pipeline_id
    );

    let outcome = run_service::run_for_alert(
        &state.pool,
        alert.pipeline_id,
        &alert.hostname,
        &alert.trigger_name,
    )
    .await?;

    Ok((StatusCode::ACCEPTED, Json(outcome)))
}
