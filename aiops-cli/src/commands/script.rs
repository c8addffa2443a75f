//! Script command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::config::Config;

/// Script subcommands
#[derive(Subcommand)]
pub enum ScriptCommands {
    /// List all scripts
    List,
    /// Show a script's body
    Get {
        /// Script ID
        id: Uuid,
    },
}

/// Handle script commands
pub async fn handle_script_command(command: ScriptCommands, config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.server_url);

    match command {
        ScriptCommands::List => list_scripts(&client).await,
        ScriptCommands::Get { id } => get_script(&client, id).await,
    }
}

/// List all scripts
async fn list_scripts(client: &ApiClient) -> Result<()> {
    let scripts = client.list_scripts().await?;

    if scripts.is_empty() {
        println!("{}", "No scripts found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} script(s):", scripts.len()).bold());
    println!();
    for script in scripts {
        println!(
            "  {} {} {}",
            script.id.to_string().cyan(),
            script.name.bold(),
            format!("[{}]", script.script_type).dimmed()
        );
    }

    Ok(())
}

/// Show a script's body
async fn get_script(client: &ApiClient, id: Uuid) -> Result<()> {
    let script = client.get_script(id).await?;

    println!("{} {}", script.name.bold(), format!("[{}]", script.script_type).dimmed());
    println!();
    println!("{}", script.content);

    Ok(())
}
