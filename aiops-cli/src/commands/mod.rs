//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod admin;
mod host;
mod pipeline;
mod schedule;
mod script;

pub use admin::AdminCommands;
pub use host::HostCommands;
pub use pipeline::PipelineCommands;
pub use schedule::ScheduleCommands;
pub use script::ScriptCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Host registry
    Host {
        #[command(subcommand)]
        command: HostCommands,
    },
    /// Script store
    Script {
        #[command(subcommand)]
        command: ScriptCommands,
    },
    /// Pipeline management
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Scheduled jobs
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
    /// Administrative setup
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

/// Handle a CLI command
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Host { command } => host::handle_host_command(command, config).await,
        Commands::Script { command } => script::handle_script_command(command, config).await,
        Commands::Pipeline { command } => pipeline::handle_pipeline_command(command, config).await,
        Commands::Schedule { command } => schedule::handle_schedule_command(command, config).await,
        Commands::Admin { command } => admin::handle_admin_command(command, config).await,
    }
}
