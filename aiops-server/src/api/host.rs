//! Host API Handlers
//!
//! HTTP endpoints for the host registry and host groups.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use aiops_core::domain::host::{Host, HostGroup};
use aiops_core::dto::host::{ConnectionTest, CreateHostGroup, SaveHost};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::host_service;

impl From<host_service::HostError> for ApiError {
    fn from(err: host_service::HostError) -> Self {
        match err {
            host_service::HostError::NotFound(id) => {
                ApiError::NotFound(format!("Host {} not found", id))
            }
            host_service::HostError::DuplicateName(msg) => ApiError::Conflict(msg),
            host_service::HostError::ValidationError(msg) => ApiError::BadRequest(msg),
            host_service::HostError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

/// POST /host/create
/// Register a new host
pub async fn create_host(
    State(state): State<AppState>,
    Json(req): Json<SaveHost>,
) -> ApiResult<(StatusCode, Json<Host>)> {
    tracing::info!("Creating host: {}", req.name);

    let host = host_service::create_host(&state.pool, req).await?;

    Ok((StatusCode::CREATED, Json(host)))
}

/// GET /host/list
/// List all hosts
pub async fn list_hosts(State(state): State<AppState>) -> ApiResult<Json<Vec<Host>>> {
    tracing::debug!("Listing all hosts");

    let hosts = host_service::list_hosts(&state.pool).await?;

    Ok(Json(hosts))
}

/// GET /host/{id}
/// Get host by ID
pub async fn get_host(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Host>> {
    tracing::debug!("Getting host: {}", id);

    let host = host_service::get_host(&state.pool, id).await?;

    Ok(Json(host))
}

/// PUT /host/{id}
/// Update a host
pub async fn update_host(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveHost>,
) -> ApiResult<Json<Host>> {
    tracing::info!("Updating host: {}", id);

    let host = host_service::update_host(&state.pool, id, req).await?;

    Ok(Json(host))
}

/// DELETE /host/{id}
/// Delete a host
pub async fn delete_host(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting host: {}", id);

    host_service::delete_host(&state.pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /host/{id}/test
/// Probe SSH connectivity to a host
pub async fn test_connection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ConnectionTest>> {
    tracing::info!("Testing SSH connection to host: {}", id);

    let result = host_service::test_connection(&state.pool, id).await?;

    Ok(Json(result))
}

/// POST /host-group/create
/// Create a host group
pub async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<CreateHostGroup>,
) -> ApiResult<(StatusCode, Json<HostGroup>)> {
    tracing::info!("Creating host group: {}", req.name);

    let group = host_service::create_group(&state.pool, &req.name).await?;

    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /host-group/list
/// List all host groups
pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Json<Vec<HostGroup>>> {
    let groups = host_service::list_groups(&state.pool).await?;

    Ok(Json(groups))
}

/// DELETE /host-group/{id}
/// Delete a host group
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting host group: {}", id);

    host_service::delete_group(&state.pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
