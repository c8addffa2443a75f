//! Administrative command handlers
//!
//! First-time setup: default access groups, the initial admin account,
//! and API key issuance for webhook callers.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use uuid::Uuid;

use aiops_core::dto::user::CreateUser;

use crate::api::ApiClient;
use crate::config::Config;

/// Admin subcommands
#[derive(Subcommand)]
pub enum AdminCommands {
    /// Create the Admin/Engineer/Viewer access groups if missing
    CreateDefaultGroups,
    /// Create an admin user in the Admin group
    CreateAdmin {
        /// Username for the new admin
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (min 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Issue a fresh API key for a user
    IssueApiKey {
        /// User ID
        id: Uuid,
    },
}

/// Handle admin commands
pub async fn handle_admin_command(command: AdminCommands, config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.server_url);

    match command {
        AdminCommands::CreateDefaultGroups => create_default_groups(&client).await,
        AdminCommands::CreateAdmin {
            username,
            email,
            password,
        } => create_admin(&client, username, email, password).await,
        AdminCommands::IssueApiKey { id } => issue_api_key(&client, id).await,
    }
}

/// Create the default access groups
async fn create_default_groups(client: &ApiClient) -> Result<()> {
    let groups = client.create_default_groups().await?;

    println!("{}", "✓ Default groups ready:".green().bold());
    for group in groups {
        println!("  {} {}", group.id.to_string().cyan(), group.name.bold());
    }

    Ok(())
}

/// Create an admin user in the Admin group
async fn create_admin(
    client: &ApiClient,
    username: String,
    email: String,
    password: String,
) -> Result<()> {
    let groups = client.create_default_groups().await?;
    let admin_group = groups
        .iter()
        .find(|g| g.name == "Admin")
        .ok_or_else(|| anyhow::anyhow!("Admin group missing after defaults setup"))?;

    let user = client
        .create_user(CreateUser {
            username,
            email,
            password,
            group_id: Some(admin_group.id),
        })
        .await?;

    println!("{}", "✓ Admin user created!".green().bold());
    println!("  ID:       {}", user.id.to_string().cyan());
    println!("  Username: {}", user.username.bold());

    Ok(())
}

/// Issue a fresh API key for a user
async fn issue_api_key(client: &ApiClient, id: Uuid) -> Result<()> {
    let issued = client.issue_api_key(id).await?;

    println!("{}", "✓ API key issued!".green().bold());
    println!("  {}", issued.api_key.cyan().bold());
    println!(
        "{}",
        "  Store this key now; it is not shown again.".yellow()
    );

    Ok(())
}
