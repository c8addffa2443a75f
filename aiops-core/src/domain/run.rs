//! Run-scoped types
//!
//! These types only exist for the duration of one pipeline run. They are
//! returned to the caller but never persisted.

use serde::{Deserialize, Serialize};

/// Per-node outcome record emitted by the execution engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_name: String,
    pub success: bool,
    pub output: String,
    pub error: String,
}

impl StepResult {
    pub fn ok(step_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            success: true,
            output: output.into(),
            error: String::new(),
        }
    }

    pub fn failed(step_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            success: false,
            output: String::new(),
            error: error.into(),
        }
    }
}

/// Run-level options supplied by the trigger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOptions {
    /// Wrap script commands for elevated execution
    #[serde(default)]
    pub use_sudo: bool,
    /// AI backend used by analysis action nodes
    #[serde(default)]
    pub ai_provider: AiProvider,
}

/// Selectable generative-AI backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAi,
    Gemini,
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::OpenAi => write!(f, "openai"),
            AiProvider::Gemini => write!(f, "gemini"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_result_constructors() {
        let ok = StepResult::ok("Check uptime", "up 3 days");
        assert!(ok.success);
        assert!(ok.error.is_empty());

        let failed = StepResult::failed("Check uptime", "no host connected");
        assert!(!failed.success);
        assert!(failed.output.is_empty());
    }

    #[test]
    fn test_run_options_defaults() {
        let opts: RunOptions = serde_json::from_str("{}").unwrap();
        assert!(!opts.use_sudo);
        assert_eq!(opts.ai_provider, AiProvider::OpenAi);
    }

    #[test]
    fn test_ai_provider_serde_tag() {
        let p: AiProvider = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(p, AiProvider::Gemini);
    }
}
