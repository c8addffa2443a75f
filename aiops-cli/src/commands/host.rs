//! Host command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::config::Config;

/// Host subcommands
#[derive(Subcommand)]
pub enum HostCommands {
    /// List all hosts
    List,
    /// Probe SSH connectivity to a host
    Test {
        /// Host ID
        id: Uuid,
    },
}

/// Handle host commands
pub async fn handle_host_command(command: HostCommands, config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.server_url);

    match command {
        HostCommands::List => list_hosts(&client).await,
        HostCommands::Test { id } => test_host(&client, id).await,
    }
}

/// List all hosts
async fn list_hosts(client: &ApiClient) -> Result<()> {
    let hosts = client.list_hosts().await?;

    if hosts.is_empty() {
        println!("{}", "No hosts found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} host(s):", hosts.len()).bold());
    println!();
    for host in hosts {
        println!(
            "  {} {} {}",
            host.id.to_string().cyan(),
            host.name.bold(),
            format!("({}@{})", host.ssh_user, host.connect_address()).dimmed()
        );
    }

    Ok(())
}

/// Probe SSH connectivity to a host
async fn test_host(client: &ApiClient, id: Uuid) -> Result<()> {
    let result = client.test_host(id).await?;

    if result.success {
        println!("{} {}", "✓".green().bold(), result.message);
    } else {
        println!("{} {}", "✗".red().bold(), result.message);
    }

    Ok(())
}
