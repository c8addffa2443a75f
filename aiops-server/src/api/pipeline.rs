//! Pipeline API Handlers
//!
//! HTTP endpoints for pipeline management, execution, and export.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use aiops_core::domain::pipeline::Pipeline;
use aiops_core::dto::pipeline::{
    PipelineSummary, PipelineYaml, PushPipeline, RunOutcome, RunPipeline, SavePipeline,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::{pipeline_service, run_service};

impl From<pipeline_service::PipelineError> for ApiError {
    fn from(err: pipeline_service::PipelineError) -> Self {
        match err {
            pipeline_service::PipelineError::NotFound(id) => {
                ApiError::NotFound(format!("Pipeline {} not found", id))
            }
            pipeline_service::PipelineError::ValidationError(msg) => ApiError::BadRequest(msg),
            pipeline_service::PipelineError::NotConfigured(msg) => ApiError::BadRequest(msg),
            pipeline_service::PipelineError::ExportError(msg) => ApiError::InternalError(msg),
            pipeline_service::PipelineError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<run_service::RunError> for ApiError {
    fn from(err: run_service::RunError) -> Self {
        match err {
            run_service::RunError::PipelineNotFound(id) => {
                ApiError::NotFound(format!("Pipeline {} not found", id))
            }
            run_service::RunError::HostNotFound(name) => {
                ApiError::NotFound(format!("Host '{}' not found", name))
            }
            run_service::RunError::AiError(msg) => ApiError::BadRequest(msg),
            run_service::RunError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

/// POST /pipeline/save
/// Save a pipeline (create, or update when the name already exists)
pub async fn save_pipeline(
    State(state): State<AppState>,
    Json(req): Json<SavePipeline>,
) -> ApiResult<Json<Pipeline>> {
    tracing::info!("Saving pipeline: {}", req.name);

    let pipeline = pipeline_service::save_pipeline(&state.pool, req).await?;

    Ok(Json(pipeline))
}

/// GET /pipeline/list
/// List all pipelines
pub async fn list_pipelines(State(state): State<AppState>) -> ApiResult<Json<Vec<PipelineSummary>>> {
    tracing::debug!("Listing all pipelines");

    let pipelines = pipeline_service::list_pipelines(&state.pool).await?;

    Ok(Json(pipelines))
}

/// GET /pipeline/{id}
/// Get pipeline by ID
pub async fn get_pipeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Pipeline>> {
    tracing::debug!("Getting pipeline: {}", id);

    let pipeline = pipeline_service::get_pipeline(&state.pool, id).await?;

    Ok(Json(pipeline))
}

/// DELETE /pipeline/{id}
/// Delete a pipeline
pub async fn delete_pipeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting pipeline: {}", id);

    pipeline_service::delete_pipeline(&state.pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /pipeline/{id}/run
/// Run a pipeline and return its ordered step results
pub async fn run_pipeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RunPipeline>,
) -> ApiResult<Json<RunOutcome>> {
    tracing::info!("Manual run requested for pipeline: {}", id);

    let outcome = run_service::run_pipeline(&state.pool, id, req.options).await?;

    Ok(Json(outcome))
}

/// GET /pipeline/{id}/yaml
/// Render a pipeline's definition as YAML
pub async fn get_pipeline_yaml(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PipelineYaml>> {
    let rendered = pipeline_service::render_yaml(&state.pool, id).await?;

    Ok(Json(rendered))
}

/// POST /pipeline/{id}/push
/// Push a pipeline's YAML rendering to the configured GitHub repository
pub async fn push_pipeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PushPipeline>,
) -> ApiResult<Json<serde_json::Value>> {
    tracing::info!("Pushing pipeline {} to GitHub", id);

    let commit = pipeline_service::push_to_github(&state.pool, id, req).await?;

    Ok(Json(serde_json::json!({ "commit": commit })))
}
