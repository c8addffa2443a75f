//! Run Service
//!
//! Assembles the execution engine with its live adapters and is the single
//! entry point for manual, scheduled, and webhook-triggered runs. Also
//! hosts the AI helper operations (script generation, dry run, analysis),
//! which share the adapter wiring.

use std::sync::Arc;

use aiops_core::domain::run::{AiProvider, RunOptions};
use aiops_core::domain::settings::{SettingsMap, SmtpSettings, keys};
use aiops_core::dto::pipeline::RunOutcome;
use aiops_engine::ai::{self, AiClient};
use aiops_engine::notify::{ChatNotifier, EmailNotifier, NotificationDispatcher};
use aiops_engine::ssh::SshCommandRunner;
use aiops_engine::{Analyzer, PipelineExecutor};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::{host_repository, pipeline_repository, settings_repository};

/// Service error type
#[derive(Debug)]
pub enum RunError {
    PipelineNotFound(Uuid),
    HostNotFound(String),
    AiError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for RunError {
    fn from(err: sqlx::Error) -> Self {
        RunError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, RunError>;

/// Run a pipeline against the host registry (manual and scheduled triggers)
pub async fn run_pipeline(pool: &PgPool, id: Uuid, options: RunOptions) -> Result<RunOutcome> {
    let pipeline = pipeline_repository::find_by_id(pool, id)
        .await?
        .ok_or(RunError::PipelineNotFound(id))?;
    let hosts = host_repository::list_all(pool).await?;

    let executor = build_executor(pool).await?;
    let steps = executor.run(&pipeline, &hosts, &options).await;

    Ok(RunOutcome {
        pipeline_id: pipeline.id,
        pipeline_name: pipeline.name,
        steps,
    })
}

/// Run a pipeline for an inbound monitoring alert (webhook trigger)
///
/// The alert names its host; the pipeline executes against that single
/// host in declaration order and halts on the first script failure.
pub async fn run_for_alert(
    pool: &PgPool,
    pipeline_id: Uuid,
    hostname: &str,
    trigger_name: &str,
) -> Result<RunOutcome> {
    let pipeline = pipeline_repository::find_by_id(pool, pipeline_id)
        .await?
        .ok_or(RunError::PipelineNotFound(pipeline_id))?;
    let host = host_repository::find_by_name(pool, hostname)
        .await?
        .ok_or_else(|| RunError::HostNotFound(hostname.to_string()))?;

    let executor = build_executor(pool).await?;
    let options = RunOptions::default();
    let steps = executor
        .run_webhook(&pipeline, &host, trigger_name, &options)
        .await;

    Ok(RunOutcome {
        pipeline_id: pipeline.id,
        pipeline_name: pipeline.name,
        steps,
    })
}

/// Generate a script body from a natural-language description
pub async fn generate_script(
    pool: &PgPool,
    prompt: &str,
    script_type: &str,
    provider: AiProvider,
) -> Result<String> {
    let analyzer = build_analyzer(pool).await?;
    analyzer
        .generate(&ai::generation_prompt(prompt, script_type), provider)
        .await
        .map_err(|e| RunError::AiError(e.to_string()))
}

/// Explain what a script would do without running it
pub async fn dry_run_script(pool: &PgPool, script: &str, provider: AiProvider) -> Result<String> {
    let analyzer = build_analyzer(pool).await?;
    analyzer
        .generate(&ai::dry_run_prompt(script), provider)
        .await
        .map_err(|e| RunError::AiError(e.to_string()))
}

/// Analyze captured script output or an error
pub async fn analyze_output(
    pool: &PgPool,
    script: &str,
    output: &str,
    error: &str,
    provider: AiProvider,
) -> Result<String> {
    let analyzer = build_analyzer(pool).await?;
    analyzer
        .generate(&ai::analysis_prompt(script, output, error), provider)
        .await
        .map_err(|e| RunError::AiError(e.to_string()))
}

// =============================================================================
// Adapter wiring
// =============================================================================

/// Build the execution engine from the current settings rows.
///
/// Settings are read fresh per run so operators can rotate keys or change
/// webhook targets without a restart. Missing settings do not fail here;
/// each adapter fails closed at its call site with a descriptive error.
async fn build_executor(pool: &PgPool) -> Result<PipelineExecutor> {
    let settings = settings_repository::load_all(pool).await?;

    let runner = SshCommandRunner::new();
    let analyzer = ai_client(&settings);
    let notifier = NotificationDispatcher::new(
        ChatNotifier::new(settings.get(keys::CHAT_WEBHOOK_URL).cloned()),
        EmailNotifier::new(
            SmtpSettings::from_map(&settings),
            settings.get(keys::NOTIFY_EMAIL_RECIPIENT).cloned(),
        ),
    );

    Ok(PipelineExecutor::new(
        Arc::new(runner),
        Arc::new(analyzer),
        Arc::new(notifier),
    ))
}

async fn build_analyzer(pool: &PgPool) -> Result<AiClient> {
    let settings = settings_repository::load_all(pool).await?;
    Ok(ai_client(&settings))
}

fn ai_client(settings: &SettingsMap) -> AiClient {
    AiClient::new(
        settings.get(keys::OPENAI_API_KEY).cloned(),
        settings.get(keys::GEMINI_API_KEY).cloned(),
    )
}
