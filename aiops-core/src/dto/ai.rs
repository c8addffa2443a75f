//! AI helper DTOs

use crate::domain::run::AiProvider;
use crate::domain::script::ScriptType;
use serde::{Deserialize, Serialize};

/// Request to generate a script from a natural-language prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateScript {
    pub prompt: String,
    pub script_type: ScriptType,
    #[serde(default)]
    pub ai_provider: AiProvider,
}

/// Request to explain what a script would do without running it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DryRunScript {
    pub script: String,
    #[serde(default)]
    pub ai_provider: AiProvider,
}

/// Request to analyze captured script output or an error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeOutput {
    pub script: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub ai_provider: AiProvider,
}

/// Free-text result from an AI helper endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiText {
    pub text: String,
}
