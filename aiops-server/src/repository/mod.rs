//! Repository Module
//!
//! Data access layer for the server.
//! Each repository handles database operations for a specific domain entity.

pub mod host;
pub mod pipeline;
pub mod schedule;
pub mod script;
pub mod settings;
pub mod user;

// Re-export for convenience
pub use host as host_repository;
pub use pipeline as pipeline_repository;
pub use schedule as schedule_repository;
pub use script as script_repository;
pub use settings as settings_repository;
pub use user as user_repository;
