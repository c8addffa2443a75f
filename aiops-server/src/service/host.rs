//! Host Service
//!
//! Business logic for host and host group management, plus the SSH
//! connection probe.

use aiops_core::domain::host::{DISTROS, Host, HostGroup};
use aiops_core::dto::host::{ConnectionTest, SaveHost};
use aiops_engine::ssh::SshCommandRunner;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::repository::host_repository;

/// Service error type
#[derive(Debug)]
pub enum HostError {
    NotFound(Uuid),
    DuplicateName(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for HostError {
    fn from(err: sqlx::Error) -> Self {
        HostError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, HostError>;

/// Create a new host
pub async fn create_host(pool: &PgPool, req: SaveHost) -> Result<Host> {
    validate_host_request(&req)?;

    let host = host_repository::create(pool, req).await.map_err(|e| {
        if db::is_unique_violation(&e) {
            HostError::DuplicateName("A host with this name already exists".to_string())
        } else {
            HostError::DatabaseError(e)
        }
    })?;

    tracing::info!("Host created: {} ({})", host.name, host.id);

    Ok(host)
}

/// Get a host by ID
pub async fn get_host(pool: &PgPool, id: Uuid) -> Result<Host> {
    host_repository::find_by_id(pool, id)
        .await?
        .ok_or(HostError::NotFound(id))
}

/// List all hosts
pub async fn list_hosts(pool: &PgPool) -> Result<Vec<Host>> {
    Ok(host_repository::list_all(pool).await?)
}

/// Update a host
pub async fn update_host(pool: &PgPool, id: Uuid, req: SaveHost) -> Result<Host> {
    validate_host_request(&req)?;

    let updated = host_repository::update(pool, id, req).await.map_err(|e| {
        if db::is_unique_violation(&e) {
            HostError::DuplicateName("A host with this name already exists".to_string())
        } else {
            HostError::DatabaseError(e)
        }
    })?;

    if !updated {
        return Err(HostError::NotFound(id));
    }

    get_host(pool, id).await
}

/// Delete a host
pub async fn delete_host(pool: &PgPool, id: Uuid) -> Result<()> {
    let deleted = host_repository::delete(pool, id).await?;

    if !deleted {
        return Err(HostError::NotFound(id));
    }

    tracing::info!("Host deleted: {}", id);

    Ok(())
}

/// Probe SSH connectivity to a host
///
/// Failures are reported in the response body, not as an error status; a
/// broken host record is a normal outcome for this endpoint.
pub async fn test_connection(pool: &PgPool, id: Uuid) -> Result<ConnectionTest> {
    let host = get_host(pool, id).await?;
    let runner = SshCommandRunner::new();

    match runner.test_connection(&host).await {
        Ok(message) => Ok(ConnectionTest {
            success: true,
            message,
        }),
        Err(err) => Ok(ConnectionTest {
            success: false,
            message: err.to_string(),
        }),
    }
}

/// Create a host group
pub async fn create_group(pool: &PgPool, name: &str) -> Result<HostGroup> {
    if name.trim().is_empty() {
        return Err(HostError::ValidationError(
            "Group name cannot be empty".to_string(),
        ));
    }

    host_repository::create_group(pool, name).await.map_err(|e| {
        if db::is_unique_violation(&e) {
            HostError::DuplicateName("A group with this name already exists".to_string())
        } else {
            HostError::DatabaseError(e)
        }
    })
}

/// List all host groups
pub async fn list_groups(pool: &PgPool) -> Result<Vec<HostGroup>> {
    Ok(host_repository::list_groups(pool).await?)
}

/// Delete a host group
pub async fn delete_group(pool: &PgPool, id: Uuid) -> Result<()> {
    let deleted = host_repository::delete_group(pool, id).await?;

    if !deleted {
        return Err(HostError::NotFound(id));
    }

    Ok(())
}

// =============================================================================
// Validation
// =============================================================================

fn validate_host_request(req: &SaveHost) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(HostError::ValidationError(
            "Host name cannot be empty".to_string(),
        ));
    }

    if req.ssh_user.trim().is_empty() {
        return Err(HostError::ValidationError(
            "SSH user cannot be empty".to_string(),
        ));
    }

    if let Some(distro) = &req.distro {
        if !DISTROS.contains(&distro.as_str()) {
            return Err(HostError::ValidationError(format!(
                "Unknown distro '{}'",
                distro
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SaveHost {
        SaveHost {
            name: "web1".to_string(),
            address: "10.0.0.5".to_string(),
            os_type: "linux".to_string(),
            distro: Some("Ubuntu".to_string()),
            ssh_user: "ops".to_string(),
            ssh_key_path: None,
            password: None,
            location: None,
            description: None,
            group_id: None,
        }
    }

    #[test]
    fn test_validation_accepts_known_distro() {
        assert!(validate_host_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_validation_rejects_blank_name() {
        let mut req = valid_request();
        req.name = "  ".to_string();
        assert!(matches!(
            validate_host_request(&req),
            Err(HostError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_unknown_distro() {
        let mut req = valid_request();
        req.distro = Some("templeos".to_string());
        assert!(matches!(
            validate_host_request(&req),
            Err(HostError::ValidationError(_))
        ));
    }
}
