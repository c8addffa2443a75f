use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create host groups table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS host_groups (
            id UUID PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create hosts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hosts (
            id UUID PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE,
            address VARCHAR(255) NOT NULL,
            os_type VARCHAR(50) NOT NULL,
            distro VARCHAR(50),
            ssh_user VARCHAR(100) NOT NULL,
            ssh_key_path VARCHAR(255),
            password VARCHAR(255),
            location VARCHAR(100),
            description TEXT,
            group_id UUID REFERENCES host_groups(id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create scripts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scripts (
            id UUID PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE,
            content TEXT NOT NULL,
            script_type VARCHAR(20) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create pipelines table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipelines (
            id UUID PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE,
            description TEXT,
            definition JSONB NOT NULL DEFAULT '{"nodes":{},"connections":[]}',
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create scheduled jobs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scheduled_jobs (
            id UUID PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            pipeline_id UUID NOT NULL REFERENCES pipelines(id) ON DELETE CASCADE,
            cron_expr VARCHAR(100) NOT NULL,
            enabled BOOLEAN NOT NULL DEFAULT TRUE,
            last_run TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create access groups table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS access_groups (
            id UUID PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE,
            permissions JSONB NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username VARCHAR(100) NOT NULL UNIQUE,
            email VARCHAR(255) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            api_key VARCHAR(255) UNIQUE,
            group_id UUID REFERENCES access_groups(id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create settings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key VARCHAR(100) PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common lookups
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_hosts_group_id ON hosts(group_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_scheduled_jobs_pipeline_id ON scheduled_jobs(pipeline_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_api_key ON users(api_key)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// True when the error is a Postgres unique-constraint violation.
/// Duplicate names surface to callers as conflicts instead of 500s.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}
