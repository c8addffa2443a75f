//! Host Repository
//!
//! Handles all database operations related to hosts and host groups.

use aiops_core::domain::host::{Host, HostGroup};
use aiops_core::dto::host::SaveHost;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new host
pub async fn create(pool: &PgPool, req: SaveHost) -> Result<Host, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO hosts (
            id, name, address, os_type, distro, ssh_user, ssh_key_path,
            password, location, description, group_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.address)
    .bind(&req.os_type)
    .bind(&req.distro)
    .bind(&req.ssh_user)
    .bind(&req.ssh_key_path)
    .bind(&req.password)
    .bind(&req.location)
    .bind(&req.description)
    .bind(req.group_id)
    .execute(pool)
    .await?;

    Ok(host_from_save(id, req))
}

/// Find a host by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Host>, sqlx::Error> {
    let row = sqlx::query_as::<_, HostRow>(
        r#"
        SELECT id, name, address, os_type, distro, ssh_user, ssh_key_path,
               password, location, description, group_id
        FROM hosts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Find a host by its unique name
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Host>, sqlx::Error> {
    let row = sqlx::query_as::<_, HostRow>(
        r#"
        SELECT id, name, address, os_type, distro, ssh_user, ssh_key_path,
               password, location, description, group_id
        FROM hosts
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all hosts
pub async fn list_all(pool: &PgPool) -> Result<Vec<Host>, sqlx::Error> {
    let rows = sqlx::query_as::<_, HostRow>(
        r#"
        SELECT id, name, address, os_type, distro, ssh_user, ssh_key_path,
               password, location, description, group_id
        FROM hosts
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Update a host
pub async fn update(pool: &PgPool, id: Uuid, req: SaveHost) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE hosts
        SET name = $1, address = $2, os_type = $3, distro = $4, ssh_user = $5,
            ssh_key_path = $6, password = $7, location = $8, description = $9,
            group_id = $10
        WHERE id = $11
        "#,
    )
    .bind(&req.name)
    .bind(&req.address)
    .bind(&req.os_type)
    .bind(&req.distro)
    .bind(&req.ssh_user)
    .bind(&req.ssh_key_path)
    .bind(&req.password)
    .bind(&req.location)
    .bind(&req.description)
    .bind(req.group_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a host by ID
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM hosts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Create a host group
pub async fn create_group(pool: &PgPool, name: &str) -> Result<HostGroup, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO host_groups (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(HostGroup {
        id,
        name: name.to_string(),
    })
}

/// List all host groups
pub async fn list_groups(pool: &PgPool) -> Result<Vec<HostGroup>, sqlx::Error> {
    let rows = sqlx::query_as::<_, HostGroupRow>("SELECT id, name FROM host_groups ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Delete a host group by ID
pub async fn delete_group(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM host_groups WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn host_from_save(id: Uuid, req: SaveHost) -> Host {
    Host {
        id,
        name: req.name,
        address: req.address,
        os_type: req.os_type,
        distro: req.distro,
        ssh_user: req.ssh_user,
        ssh_key_path: req.ssh_key_path,
        password: req.password,
        location: req.location,
        description: req.description,
        group_id: req.group_id,
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct HostRow {
    id: Uuid,
    name: String,
    address: String,
    os_type: String,
    distro: Option<String>,
    ssh_user: String,
    ssh_key_path: Option<String>,
    password: Option<String>,
    location: Option<String>,
    description: Option<String>,
    group_id: Option<Uuid>,
}

impl From<HostRow> for Host {
    fn from(row: HostRow) -> Self {
        Host {
            id: row.id,
            name: row.name,
            address: row.address,
            os_type: row.os_type,
            distro: row.distro,
            ssh_user: row.ssh_user,
            ssh_key_path: row.ssh_key_path,
            password: row.password,
            location: row.location,
            description: row.description,
            group_id: row.group_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct HostGroupRow {
    id: Uuid,
    name: String,
}

impl From<HostGroupRow> for HostGroup {
    fn from(row: HostGroupRow) -> Self {
        HostGroup {
            id: row.id,
            name: row.name,
        }
    }
}
