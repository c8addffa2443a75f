//! API Module
//!
//! HTTP API layer for the server.
//! Each submodule handles endpoints for a specific domain.

pub mod ai;
pub mod auth;
pub mod error;
pub mod health;
pub mod host;
pub mod pipeline;
pub mod schedule;
pub mod script;
pub mod settings;
pub mod stubs;
pub mod user;
pub mod webhook;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::scheduler::Scheduler;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub scheduler: Scheduler,
}

/// Create the main API router with all endpoints
pub fn create_router(pool: PgPool, scheduler: Scheduler) -> Router {
    let state = AppState { pool, scheduler };

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Host endpoints
        .route("/host/create", post(host::create_host))
        .route("/host/list", get(host::list_hosts))
        .route("/host/{id}", get(host::get_host))
        .route("/host/{id}", put(host::update_host))
        .route("/host/{id}", delete(host::delete_host))
        .route("/host/{id}/test", post(host::test_connection))
        // Host group endpoints
        .route("/host-group/create", post(host::create_group))
        .route("/host-group/list", get(host::list_groups))
        .route("/host-group/{id}", delete(host::delete_group))
        // Script endpoints
        .route("/script/create", post(script::create_script))
        .route("/script/list", get(script::list_scripts))
        .route("/script/{id}", get(script::get_script))
        .route("/script/{id}", put(script::update_script))
        .route("/script/{id}", delete(script::delete_script))
        // Pipeline endpoints
        .route("/pipeline/save", post(pipeline::save_pipeline))
        .route("/pipeline/list", get(pipeline::list_pipelines))
        .route("/pipeline/{id}", get(pipeline::get_pipeline))
        .route("/pipeline/{id}", delete(pipeline::delete_pipeline))
        .route("/pipeline/{id}/run", post(pipeline::run_pipeline))
        .route("/pipeline/{id}/yaml", get(pipeline::get_pipeline_yaml))
        .route("/pipeline/{id}/push", post(pipeline::push_pipeline))
        // AI helper endpoints
        .route("/ai/generate", post(ai::generate_script))
        .route("/ai/dry-run", post(ai::dry_run_script))
        .route("/ai/analyze", post(ai::analyze_output))
        // Schedule endpoints
        .route("/schedule/create", post(schedule::create_schedule))
        .route("/schedule/list", get(schedule::list_schedules))
        .route("/schedule/{id}", get(schedule::get_schedule))
        .route("/schedule/{id}", put(schedule::update_schedule))
        .route("/schedule/{id}", delete(schedule::delete_schedule))
        .route("/schedule/{id}/pause", post(schedule::pause_schedule))
        .route("/schedule/{id}/resume", post(schedule::resume_schedule))
        .route("/schedule/{id}/run", post(schedule::run_schedule_now))
        // User and access group endpoints
        .route("/user/create", post(user::create_user))
        .route("/user/list", get(user::list_users))
        .route("/user/{id}", get(user::get_user))
        .route("/user/{id}", delete(user::delete_user))
        .route("/user/{id}/api-key", post(user::issue_api_key))
        .route("/group/create", post(user::create_group))
        .route("/group/defaults", post(user::create_default_groups))
        .route("/group/list", get(user::list_groups))
        .route("/group/{id}", delete(user::delete_group))
        // Settings endpoints
        .route("/settings", get(settings::get_settings))
        .route("/settings", put(settings::update_settings))
        // Inbound monitoring webhook
        .route("/webhook/alert", post(webhook::receive_alert))
        // Not-yet-implemented endpoints
        .route("/backup/create", post(stubs::backup))
        .route("/backup/restore", post(stubs::restore))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
