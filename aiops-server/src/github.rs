//! GitHub export adapter
//!
//! Pushes rendered pipeline YAML through the GitHub contents API. An
//! existing file is updated in place (its blob sha is looked up first);
//! a missing file is created.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "aiops-runner";

#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("GitHub request failed: {0}")]
    Request(String),
    #[error("GitHub rejected the push: {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected GitHub response: {0}")]
    Response(String),
}

/// Create or update `path` in `repo` ("owner/name") and return the commit sha
pub async fn push_file(
    repo: &str,
    token: &str,
    path: &str,
    content: &str,
    commit_message: &str,
) -> Result<String, GitHubError> {
    let client = reqwest::Client::new();
    let url = format!("{}/repos/{}/contents/{}", API_BASE, repo, path);

    let existing_sha = fetch_blob_sha(&client, &url, token).await?;

    let mut payload = serde_json::json!({
        "message": commit_message,
        "content": BASE64.encode(content),
    });
    if let Some(sha) = existing_sha {
        payload["sha"] = serde_json::Value::String(sha);
    }

    let response = client
        .put(&url)
        .bearer_auth(token)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "application/vnd.github+json")
        .json(&payload)
        .send()
        .await
        .map_err(|e| GitHubError::Request(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(GitHubError::Rejected { status, body });
    }

    let parsed: PushResponse = response
        .json()
        .await
        .map_err(|e| GitHubError::Response(e.to_string()))?;

    Ok(parsed.commit.sha)
}

/// Look up the current blob sha for a path, if the file exists
async fn fetch_blob_sha(
    client: &reqwest::Client,
    url: &str,
    token: &str,
) -> Result<Option<String>, GitHubError> {
    let response = client
        .get(url)
        .bearer_auth(token)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "application/vnd.github+json")
        .send()
        .await
        .map_err(|e| GitHubError::Request(e.to_string()))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(GitHubError::Rejected { status, body });
    }

    let parsed: ContentsResponse = response
        .json()
        .await
        .map_err(|e| GitHubError::Response(e.to_string()))?;

    Ok(Some(parsed.sha))
}

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
}

#[derive(Deserialize)]
struct PushResponse {
    commit: CommitInfo,
}

#[derive(Deserialize)]
struct CommitInfo {
    sha: String,
}
