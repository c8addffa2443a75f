//! Pipeline command handlers
//!
//! Listing, inspection, execution, and YAML export of pipelines.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use uuid::Uuid;

use aiops_core::domain::run::{AiProvider, RunOptions};
use aiops_core::dto::pipeline::{RunOutcome, RunPipeline};

use crate::api::ApiClient;
use crate::config::Config;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// List all pipelines
    List,
    /// Get pipeline details
    Get {
        /// Pipeline ID
        id: Uuid,
    },
    /// Run a pipeline and print its step results
    Run {
        /// Pipeline ID
        id: Uuid,

        /// Wrap script commands with sudo
        #[arg(long)]
        sudo: bool,

        /// AI backend for analysis nodes (openai or gemini)
        #[arg(long, default_value = "openai")]
        provider: String,
    },
    /// Print a pipeline's YAML rendering
    Yaml {
        /// Pipeline ID
        id: Uuid,
    },
}

/// Handle pipeline commands
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.server_url);

    match command {
        PipelineCommands::List => list_pipelines(&client).await,
        PipelineCommands::Get { id } => get_pipeline(&client, id).await,
        PipelineCommands::Run { id, sudo, provider } => {
            run_pipeline(&client, id, sudo, &provider).await
        }
        PipelineCommands::Yaml { id } => print_yaml(&client, id).await,
    }
}

/// List all pipelines
async fn list_pipelines(client: &ApiClient) -> Result<()> {
    let pipelines = client.list_pipelines().await?;

    if pipelines.is_empty() {
        println!("{}", "No pipelines found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} pipeline(s):", pipelines.len()).bold()
    );
    println!();
    for pipeline in pipelines {
        println!(
            "  {} {} {}",
            pipeline.id.to_string().cyan(),
            pipeline.name.bold(),
            pipeline.description.unwrap_or_default().dimmed()
        );
    }

    Ok(())
}

/// Get and display a single pipeline
async fn get_pipeline(client: &ApiClient, id: Uuid) -> Result<()> {
    let pipeline = client.get_pipeline(id).await?;

    println!("{}", pipeline.name.bold());
    println!("  ID:          {}", pipeline.id.to_string().cyan());
    if let Some(description) = &pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Nodes:       {}", pipeline.definition.nodes.len());
    println!("  Connections: {}", pipeline.definition.connections.len());
    println!("  Updated:     {}", pipeline.updated_at.to_string().dimmed());

    Ok(())
}

/// Run a pipeline and print its step results
async fn run_pipeline(client: &ApiClient, id: Uuid, sudo: bool, provider: &str) -> Result<()> {
    let ai_provider = match provider {
        "openai" => AiProvider::OpenAi,
        "gemini" => AiProvider::Gemini,
        other => anyhow::bail!("Unknown AI provider '{}' (expected openai or gemini)", other),
    };

    let req = RunPipeline {
        options: RunOptions {
            use_sudo: sudo,
            ai_provider,
        },
    };

    let outcome = client.run_pipeline(id, req).await?;
    print_outcome(&outcome);

    if outcome.steps.iter().any(|s| !s.success) {
        std::process::exit(1);
    }

    Ok(())
}

/// Print a pipeline's YAML rendering
async fn print_yaml(client: &ApiClient, id: Uuid) -> Result<()> {
    let rendered = client.get_pipeline_yaml(id).await?;
    println!("{}", rendered.yaml);

    Ok(())
}

fn print_outcome(outcome: &RunOutcome) {
    println!(
        "{}",
        format!(
            "Pipeline '{}' finished ({} step(s)):",
            outcome.pipeline_name,
            outcome.steps.len()
        )
        .bold()
    );
    println!();

    for step in &outcome.steps {
        if step.success {
            println!("  {} {}", "✓".green().bold(), step.step_name.bold());
            if !step.output.trim().is_empty() {
                for line in step.output.trim_end().lines() {
                    println!("      {}", line.dimmed());
                }
            }
        } else {
            println!("  {} {}", "✗".red().bold(), step.step_name.bold());
            for line in step.error.trim_end().lines() {
                println!("      {}", line.red());
            }
        }
    }
}
