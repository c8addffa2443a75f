//! Placeholder API endpoints
//!
//! Backup and restore of the full database are planned but not wired up
//! yet; both endpoints answer 501 so clients can probe for support.

use axum::{Json, http::StatusCode, response::IntoResponse};

/// POST /backup/create
pub async fn backup() -> impl IntoResponse {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(serde_json::json!({ "error": "Backup is not implemented yet" })),
    )
}

/// POST /backup/restore
pub async fn restore() -> impl IntoResponse {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(serde_json::json!({ "error": "Restore is not implemented yet" })),
    )
}
