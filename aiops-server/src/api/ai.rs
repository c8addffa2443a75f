//! AI Helper API Handlers
//!
//! HTTP endpoints for script generation, dry-run explanation, and output
//! analysis outside of a pipeline run.

use axum::{Json, extract::State};
use aiops_core::dto::ai::{AiText, AnalyzeOutput, DryRunScript, GenerateScript};

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::run_service;

/// POST /ai/generate
/// Generate a script body from a natural-language description
pub async fn generate_script(
    State(state): State<AppState>,
    Json(req): Json<GenerateScript>,
) -> ApiResult<Json<AiText>> {
    tracing::info!("Generating {} script via {}", req.script_type, req.ai_provider);

    let text = run_service::generate_script(
        &state.pool,
        &req.prompt,
        &req.script_type.to_string(),
        req.ai_provider,
    )
    .await?;

    Ok(Json(AiText { text }))
}

/// POST /ai/dry-run
/// Explain what a script would do without running it
pub async fn dry_run_script(
    State(state): State<AppState>,
    Json(req): Json<DryRunScript>,
) -> ApiResult<Json<AiText>> {
    tracing::info!("Dry-run analysis via {}", req.ai_provider);

    let text = run_service::dry_run_script(&state.pool, &req.script, req.ai_provider).await?;

    Ok(Json(AiText { text }))
}

/// POST /ai/analyze
/// Analyze captured script output or an error
pub async fn analyze_output(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeOutput>,
) -> ApiResult<Json<AiText>> {
    tracing::info!("Output analysis via {}", req.ai_provider);

    let text = run_service::analyze_output(
        &state.pool,
        &req.script,
        &req.output,
        &req.error,
        req.ai_provider,
    )
    .await?;

    Ok(Json(AiText { text }))
}
