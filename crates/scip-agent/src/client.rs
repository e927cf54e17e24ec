//! Provider-agnostic completion interface

use crate::error::LlmResult;

/// A single chat completion: one system message and one user message
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Ask the provider to constrain output to a JSON object
    pub json_response: bool,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature: 0.2,
            max_tokens: None,
            json_response: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// Trait for LLM client abstraction
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Run a completion and return the raw text of the first choice
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String>;
}

/// Cut the outermost JSON object or array out of a model response.
///
/// Models sometimes wrap JSON in prose or code fences even in JSON mode.
/// Returns the trimmed input unchanged when no brackets are found.
pub fn extract_json_block(content: &str) -> &str {
    let trimmed = content.trim();
    let start = trimmed.find(['{', '[']);
    let end = trimmed.rfind(['}', ']']);

    match (start, end) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}
