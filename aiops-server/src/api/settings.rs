//! Settings API Handlers
//!
//! HTTP endpoints for the key/value settings store.

use axum::{Json, extract::State, http::StatusCode};
use aiops_core::domain::settings::SettingsMap;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::settings_service;

impl From<settings_service::SettingsError> for ApiError {
    fn from(err: settings_service::SettingsError) -> Self {
        match err {
            settings_service::SettingsError::ValidationError(msg) => ApiError::BadRequest(msg),
            settings_service::SettingsError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

/// GET /settings
/// Read all settings with secret values masked
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<SettingsMap>> {
    let settings = settings_service::get_settings(&state.pool).await?;

    Ok(Json(settings))
}

/// PUT /settings
/// Apply a batch of settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(entries): Json<SettingsMap>,
) -> ApiResult<StatusCode> {
    tracing::info!("Applying settings update ({} key(s))", entries.len());

    settings_service::update_settings(&state.pool, entries).await?;

    Ok(StatusCode::NO_CONTENT)
}
