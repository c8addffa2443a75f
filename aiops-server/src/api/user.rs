//! User API Handlers
//!
//! HTTP endpoints for users, access groups, and API key issuance.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use aiops_core::domain::user::{AccessGroup, User};
use aiops_core::dto::user::{CreateGroup, CreateUser, IssuedApiKey};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::user_service;

impl From<user_service::UserError> for ApiError {
    fn from(err: user_service::UserError) -> Self {
        match err {
            user_service::UserError::NotFound(id) => {
                ApiError::NotFound(format!("User {} not found", id))
            }
            user_service::UserError::DuplicateName(msg) => ApiError::Conflict(msg),
            user_service::UserError::ValidationError(msg) => ApiError::BadRequest(msg),
            user_service::UserError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

/// POST /user/create
/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    tracing::info!("Creating user: {}", req.username);

    let user = user_service::create_user(&state.pool, req).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /user/list
/// List all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = user_service::list_users(&state.pool).await?;

    Ok(Json(users))
}

/// GET /user/{id}
/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = user_service::get_user(&state.pool, id).await?;

    Ok(Json(user))
}

/// DELETE /user/{id}
/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting user: {}", id);

    user_service::delete_user(&state.pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /user/{id}/api-key
/// Issue a fresh API key for a user, invalidating any previous key
pub async fn issue_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<IssuedApiKey>> {
    tracing::info!("Issuing API key for user: {}", id);

    let issued = user_service::issue_api_key(&state.pool, id).await?;

    Ok(Json(issued))
}

/// POST /group/create
/// Create an access group
pub async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<CreateGroup>,
) -> ApiResult<(StatusCode, Json<AccessGroup>)> {
    tracing::info!("Creating access group: {}", req.name);

    let group = user_service::create_group(&state.pool, req).await?;

    Ok((StatusCode::CREATED, Json(group)))
}

/// POST /group/defaults
/// Create the Admin/Engineer/Viewer groups if missing
pub async fn create_default_groups(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AccessGroup>>> {
    tracing::info!("Ensuring default access groups exist");

    let groups = user_service::create_default_groups(&state.pool).await?;

    Ok(Json(groups))
}

/// GET /group/list
/// List all access groups
pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Json<Vec<AccessGroup>>> {
    let groups = user_service::list_groups(&state.pool).await?;

    Ok(Json(groups))
}

/// DELETE /group/{id}
/// Delete an access group
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting access group: {}", id);

    user_service::delete_group(&state.pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
