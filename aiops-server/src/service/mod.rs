//! Service Module
//!
//! Business logic layer for the server. Each service validates requests,
//! coordinates repositories and adapters, and maps failures to typed errors.

pub mod host;
pub mod pipeline;
pub mod run;
pub mod schedule;
pub mod script;
pub mod settings;
pub mod user;

// Re-export for convenience
pub use host as host_service;
pub use pipeline as pipeline_service;
pub use run as run_service;
pub use schedule as schedule_service;
pub use script as script_service;
pub use settings as settings_service;
pub use user as user_service;
