//! Script API Handlers
//!
//! HTTP endpoints for the script store.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use aiops_core::domain::script::Script;
use aiops_core::dto::script::{SaveScript, ScriptSummary};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::script_service;

impl From<script_service::ScriptError> for ApiError {
    fn from(err: script_service::ScriptError) -> Self {
        match err {
            script_service::ScriptError::NotFound(id) => {
                ApiError::NotFound(format!("Script {} not found", id))
            }
            script_service::ScriptError::DuplicateName(msg) => ApiError::Conflict(msg),
            script_service::ScriptError::ValidationError(msg) => ApiError::BadRequest(msg),
            script_service::ScriptError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

/// POST /script/create
/// Create a new script
pub async fn create_script(
    State(state): State<AppState>,
    Json(req): Json<SaveScript>,
) -> ApiResult<(StatusCode, Json<Script>)> {
    tracing::info!("Creating script: {}", req.name);

    let script = script_service::create_script(&state.pool, req).await?;

    Ok((StatusCode::CREATED, Json(script)))
}

/// GET /script/list
/// List all scripts (without bodies)
pub async fn list_scripts(State(state): State<AppState>) -> ApiResult<Json<Vec<ScriptSummary>>> {
    tracing::debug!("Listing all scripts");

    let scripts = script_service::list_scripts(&state.pool).await?;

    Ok(Json(scripts))
}

/// GET /script/{id}
/// Get script by ID
pub async fn get_script(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Script>> {
    tracing::debug!("Getting script: {}", id);

    let script = script_service::get_script(&state.pool, id).await?;

    Ok(Json(script))
}

/// PUT /script/{id}
/// Update a script
pub async fn update_script(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveScript>,
) -> ApiResult<Json<Script>> {
    tracing::info!("Updating script: {}", id);

    let script = script_service::update_script(&state.pool, id, req).await?;

    Ok(Json(script))
}

/// DELETE /script/{id}
/// Delete a script
pub async fn delete_script(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting script: {}", id);

    script_service::delete_script(&state.pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
