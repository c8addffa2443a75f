//! API Key Authentication
//!
//! Extractor that resolves the `X-API-Key` request header to a user. Routes
//! that take [`AuthUser`] as an argument reject requests without a valid
//! key before the handler body runs.

use aiops_core::domain::user::User;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::service::user_service;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw_key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Missing API key".to_string()))?;

        let user = user_service::authenticate_api_key(&state.pool, raw_key)
            .await
            .map_err(|e| match e {
                user_service::UserError::DatabaseError(err) => ApiError::DatabaseError(err),
                other => ApiError::InternalError(format!("{:?}", other)),
            })?
            .ok_or_else(|| ApiError::Unauthorized("Invalid API key".to_string()))?;

        Ok(AuthUser(user))
    }
}
