//! OpenAI-compatible chat completions client
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, instrument};

use crate::client::{CompletionRequest, LlmClient};
use crate::error::{LlmError, LlmResult};

const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4-turbo";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_API_BASE_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI chat completions client
#[derive(Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.config)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> LlmResult<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::config("OpenAI API key is empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let messages = [
            ChatMessage {
                role: "system",
                content: &request.system,
            },
            ChatMessage {
                role: "user",
                content: &request.prompt,
            },
        ];

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": request.temperature,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if request.json_response {
            body["response_format"] = json!({ "type": "json_object" });
        }

        body
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %self.config.model, json = request.json_response))]
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String> {
        let body = self.request_body(&request);
        debug!("Sending completion request ({} prompt chars)", request.prompt.len());

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to LLM API: {}", e);
                LlmError::Http(e)
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(LlmError::Api { status, body });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::invalid_response("response has no choices"))?
            .message
            .content
            .unwrap_or_default();

        if content.trim().is_empty() {
            error!("LLM returned empty response");
            return Err(LlmError::EmptyResponse);
        }

        Ok(content.trim().to_string())
    }
}
