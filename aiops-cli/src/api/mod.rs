//! API client module
//!
//! HTTP client for communicating with the AIOps Runner server API.

use anyhow::{Context, Result};
use reqwest::Client;
use uuid::Uuid;

use aiops_core::domain::host::Host;
use aiops_core::domain::pipeline::Pipeline;
use aiops_core::domain::schedule::ScheduledJob;
use aiops_core::domain::script::Script;
use aiops_core::domain::user::{AccessGroup, User};
use aiops_core::dto::host::ConnectionTest;
use aiops_core::dto::pipeline::{PipelineSummary, PipelineYaml, RunOutcome, RunPipeline};
use aiops_core::dto::script::ScriptSummary;
use aiops_core::dto::user::{CreateUser, IssuedApiKey};

/// HTTP client for the AIOps Runner server API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// List all hosts
    pub async fn list_hosts(&self) -> Result<Vec<Host>> {
        let url = format!("{}/host/list", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send list hosts request")?;

        self.handle_response(response).await
    }

    /// Probe SSH connectivity to a host
    pub async fn test_host(&self, id: Uuid) -> Result<ConnectionTest> {
        let url = format!("{}/host/{}/test", self.base_url, id);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to send host test request")?;

        self.handle_response(response).await
    }

    /// List all scripts
    pub async fn list_scripts(&self) -> Result<Vec<ScriptSummary>> {
        let url = format!("{}/script/list", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send list scripts request")?;

        self.handle_response(response).await
    }

    /// Get a script by ID
    pub async fn get_script(&self, id: Uuid) -> Result<Script> {
        let url = format!("{}/script/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send get script request")?;

        self.handle_response(response).await
    }

    /// List all pipelines
    pub async fn list_pipelines(&self) -> Result<Vec<PipelineSummary>> {
        let url = format!("{}/pipeline/list", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send list pipelines request")?;

        self.handle_response(response).await
    }

    /// Get a pipeline by ID
    pub async fn get_pipeline(&self, id: Uuid) -> Result<Pipeline> {
        let url = format!("{}/pipeline/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send get pipeline request")?;

        self.handle_response(response).await
    }

    /// Run a pipeline and collect its step results
    pub async fn run_pipeline(&self, id: Uuid, req: RunPipeline) -> Result<RunOutcome> {
        let url = format!("{}/pipeline/{}/run", self.base_url, id);
        let response = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to send run pipeline request")?;

        self.handle_response(response).await
    }

    /// Fetch a pipeline's YAML rendering
    pub async fn get_pipeline_yaml(&self, id: Uuid) -> Result<PipelineYaml> {
        let url = format!("{}/pipeline/{}/yaml", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send pipeline yaml request")?;

        self.handle_response(response).await
    }

    /// List all scheduled jobs
    pub async fn list_schedules(&self) -> Result<Vec<ScheduledJob>> {
        let url = format!("{}/schedule/list", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send list schedules request")?;

        self.handle_response(response).await
    }

    /// Pause or resume a scheduled job
    pub async fn set_schedule_enabled(&self, id: Uuid, enabled: bool) -> Result<ScheduledJob> {
        let action = if enabled { "resume" } else { "pause" };
        let url = format!("{}/schedule/{}/{}", self.base_url, id, action);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to send schedule update request")?;

        self.handle_response(response).await
    }

    /// Create a user
    pub async fn create_user(&self, req: CreateUser) -> Result<User> {
        let url = format!("{}/user/create", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to send create user request")?;

        self.handle_response(response).await
    }

    /// Issue a fresh API key for a user
    pub async fn issue_api_key(&self, user_id: Uuid) -> Result<IssuedApiKey> {
        let url = format!("{}/user/{}/api-key", self.base_url, user_id);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to send API key request")?;

        self.handle_response(response).await
    }

    /// Ensure the default access groups exist
    pub async fn create_default_groups(&self) -> Result<Vec<AccessGroup>> {
        let url = format!("{}/group/defaults", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to send default groups request")?;

        self.handle_response(response).await
    }

    /// Handle API response and deserialize JSON
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Request failed with status {}: {}", status, error_text);
        }

        response
            .json()
            .await
            .context("Failed to parse response JSON")
    }
}
