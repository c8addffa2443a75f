//! Schedule command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::config::Config;

/// Schedule subcommands
#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// List all scheduled jobs
    List,
    /// Pause a scheduled job
    Pause {
        /// Schedule ID
        id: Uuid,
    },
    /// Resume a paused scheduled job
    Resume {
        /// Schedule ID
        id: Uuid,
    },
}

/// Handle schedule commands
pub async fn handle_schedule_command(command: ScheduleCommands, config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.server_url);

    match command {
        ScheduleCommands::List => list_schedules(&client).await,
        ScheduleCommands::Pause { id } => set_enabled(&client, id, false).await,
        ScheduleCommands::Resume { id } => set_enabled(&client, id, true).await,
    }
}

/// List all scheduled jobs
async fn list_schedules(client: &ApiClient) -> Result<()> {
    let jobs = client.list_schedules().await?;

    if jobs.is_empty() {
        println!("{}", "No scheduled jobs found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} job(s):", jobs.len()).bold());
    println!();
    for job in jobs {
        let state = if job.enabled {
            "enabled".green()
        } else {
            "paused".yellow()
        };
        let last_run = job
            .last_run
            .map(|t| t.to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  {} {} [{}] cron '{}' last run {}",
            job.id.to_string().cyan(),
            job.name.bold(),
            state,
            job.cron_expr,
            last_run.dimmed()
        );
    }

    Ok(())
}

/// Pause or resume a scheduled job
async fn set_enabled(client: &ApiClient, id: Uuid, enabled: bool) -> Result<()> {
    let job = client.set_schedule_enabled(id, enabled).await?;

    let verb = if enabled { "resumed" } else { "paused" };
    println!(
        "{}",
        format!("✓ Schedule '{}' {}", job.name, verb).green().bold()
    );

    Ok(())
}
