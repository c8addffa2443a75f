//! AI analysis client
//!
//! Sends free-text prompts to a configurable generative-AI backend and
//! returns the generated text. Two interchangeable providers are selected
//! per request; a missing credential surfaces as an error string, never a
//! panic, so a misconfigured provider only fails its own step.

use aiops_core::domain::run::AiProvider;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::AiError;
use crate::executor::Analyzer;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

const SYSTEM_ROLE: &str = "You are an expert systems administrator and IT operations analyst.";

/// Production AI client over HTTP
pub struct AiClient {
    client: reqwest::Client,
    openai_api_key: Option<String>,
    gemini_api_key: Option<String>,
}

impl AiClient {
    pub fn new(openai_api_key: Option<String>, gemini_api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            openai_api_key: non_empty(openai_api_key),
            gemini_api_key: non_empty(gemini_api_key),
        }
    }

    async fn generate_openai(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self
            .openai_api_key
            .as_deref()
            .ok_or_else(|| AiError::MissingApiKey {
                provider: "OpenAI".to_string(),
            })?;

        let payload = json!({
            "model": OPENAI_MODEL,
            "messages": [
                {"role": "system", "content": SYSTEM_ROLE},
                {"role": "user", "content": prompt}
            ]
        });

        let response = self
            .client
            .post(OPENAI_URL)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Request(format!("{}: {}", status, body)));
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| AiError::Response(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| AiError::Response("no choices in completion".to_string()))
    }

    async fn generate_gemini(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self
            .gemini_api_key
            .as_deref()
            .ok_or_else(|| AiError::MissingApiKey {
                provider: "Gemini".to_string(),
            })?;

        let payload = json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });

        let response = self
            .client
            .post(GEMINI_URL)
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Request(format!("{}: {}", status, body)));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AiError::Response(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .ok_or_else(|| AiError::Response("no candidates in response".to_string()))
    }
}

#[async_trait]
impl Analyzer for AiClient {
    async fn generate(&self, prompt: &str, provider: AiProvider) -> Result<String, AiError> {
        debug!("Dispatching {} char prompt to {}", prompt.len(), provider);
        match provider {
            AiProvider::OpenAi => self.generate_openai(prompt).await,
            AiProvider::Gemini => self.generate_gemini(prompt).await,
        }
    }
}

// =============================================================================
// Response shapes
// =============================================================================

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: String,
}

// =============================================================================
// Prompt builders
// =============================================================================

/// Prompt for analyzing the most recent script step of a run
pub fn analysis_prompt(script: &str, output: &str, error: &str) -> String {
    if !error.is_empty() {
        format!(
            "The following script failed to execute. Analyze the script and the error \
             message to determine the cause and suggest troubleshooting steps. \
             Use 'HEADING: ' to mark section titles.\n\n\
             Script:\n```\n{}\n```\n\nError:\n```\n{}\n```",
            script, error
        )
    } else {
        format!(
            "Analyze the output of the following script. Provide a summary of what the \
             output means. Use 'HEADING: ' to mark section titles.\n\n\
             Script:\n```\n{}\n```\n\nOutput:\n```\n{}\n```",
            script, output
        )
    }
}

/// Prompt for triaging an inbound monitoring alert
pub fn alert_analysis_prompt(trigger_name: &str, host_name: &str, diagnostic_data: &str) -> String {
    format!(
        "{}\nAn alert named '{}' occurred on host '{}'. The following diagnostic data \
         was collected.\n\n\
         Here is the diagnostic data collected from the server:\n---\n{}\n---\n\n\
         Based on the data, please provide:\n\
         1. A brief, clear synopsis of the likely problem.\n\
         2. A list of recommended, actionable troubleshooting steps to resolve the issue.\n\
         3. Any other important observations or potential underlying causes.",
        SYSTEM_ROLE, trigger_name, host_name, diagnostic_data
    )
}

/// Prompt for generating a script from a natural-language description
pub fn generation_prompt(description: &str, script_type: &str) -> String {
    format!(
        "Generate a {} script that does the following: {}. The script should be \
         complete, correct, and ready to run. Only output the code itself, with no \
         explanation or markdown formatting.",
        script_type, description
    )
}

/// Prompt for explaining what a script would do without running it
pub fn dry_run_prompt(script: &str) -> String {
    format!(
        "You are a helpful Linux assistant. Analyze the following script and explain \
         what it will do when run on a server. Use 'HEADING: ' to mark section titles \
         like 'Executive Summary', 'Script Breakdown', 'Expected Output', etc. Describe \
         the expected output and any potential side effects or files that will be \
         created or modified.\n\nScript:\n```\n{}\n```",
        script
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_openai_key_is_descriptive() {
        let client = AiClient::new(None, None);
        let err = client
            .generate("hello", AiProvider::OpenAi)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("OpenAI API key is missing"));
    }

    #[tokio::test]
    async fn test_missing_gemini_key_is_descriptive() {
        let client = AiClient::new(Some("sk-openai".to_string()), None);
        let err = client
            .generate("hello", AiProvider::Gemini)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Gemini API key is missing"));
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let client = AiClient::new(Some("   ".to_string()), None);
        let err = client
            .generate("hello", AiProvider::OpenAi)
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey { .. }));
    }

    #[test]
    fn test_analysis_prompt_prefers_error_branch() {
        let prompt = analysis_prompt("uptime", "up 3 days", "connection refused");
        assert!(prompt.contains("failed to execute"));
        assert!(prompt.contains("connection refused"));
        assert!(!prompt.contains("up 3 days"));
    }

    #[test]
    fn test_analysis_prompt_output_branch() {
        let prompt = analysis_prompt("uptime", "up 3 days", "");
        assert!(prompt.contains("Analyze the output"));
        assert!(prompt.contains("up 3 days"));
    }

    #[test]
    fn test_generation_prompt_embeds_type() {
        let prompt = generation_prompt("rotate logs", "bash");
        assert!(prompt.starts_with("Generate a bash script"));
    }
}
