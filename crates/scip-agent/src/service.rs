//! AI Service
//!
//! Contract generation, validation and structure analysis on top of any
//! [`LlmClient`]. Validation and analysis never fail: when the model call or
//! the decoding of its answer goes wrong they return a well-formed fallback
//! describing the failure instead.

use std::collections::BTreeMap;
use std::sync::Arc;

use scip_types::{ContractStructure, ValidationResult};
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::client::{extract_json_block, CompletionRequest, LlmClient};
use crate::error::LlmResult;
use crate::prompts::{
    ContractPromptTemplate, ANALYSIS_SYSTEM, GENERATION_SYSTEM, VALIDATION_SYSTEM,
};

const GENERATION_TEMPERATURE: f32 = 0.2;
const GENERATION_MAX_TOKENS: u32 = 3000;
const ANALYSIS_TEMPERATURE: f32 = 0.1;

#[derive(Clone)]
pub struct AiService {
    client: Arc<dyn LlmClient>,
}

impl AiService {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Underlying client, shared with other model consumers
    pub fn client(&self) -> Arc<dyn LlmClient> {
        Arc::clone(&self.client)
    }

    /// Generate Solidity source from a natural language description
    #[instrument(skip(self, description, params))]
    pub async fn generate_contract_code(
        &self,
        description: &str,
        contract_type: &str,
        params: &BTreeMap<String, serde_json::Value>,
    ) -> LlmResult<String> {
        let prompt =
            ContractPromptTemplate::build_generation_prompt(description, contract_type, params);
        let request = CompletionRequest::new(GENERATION_SYSTEM, prompt)
            .temperature(GENERATION_TEMPERATURE)
            .max_tokens(GENERATION_MAX_TOKENS);

        let content = self.client.complete(request).await?;
        let code = strip_code_fence(&content).to_string();
        info!("Generated {} bytes of contract code", code.len());
        Ok(code)
    }

    /// Check a contract for security, gas and best-practice issues
    #[instrument(skip_all)]
    pub async fn validate_contract(&self, contract_code: &str) -> ValidationResult {
        let request = CompletionRequest::new(
            VALIDATION_SYSTEM,
            ContractPromptTemplate::build_validation_prompt(contract_code),
        )
        .temperature(ANALYSIS_TEMPERATURE)
        .json();

        match self.complete_json::<ValidationResult>(request).await {
            Ok(result) => {
                info!(
                    is_valid = result.is_valid,
                    issues = result.issues.len(),
                    "Contract validated"
                );
                result
            }
            Err(e) => {
                warn!("Validation failed, reporting system issue: {}", e);
                ValidationResult::system_failure(e)
            }
        }
    }

    /// Extract functions, variables, events and a summary from contract source
    #[instrument(skip_all)]
    pub async fn analyze_contract_structure(&self, contract_code: &str) -> ContractStructure {
        let request = CompletionRequest::new(
            ANALYSIS_SYSTEM,
            ContractPromptTemplate::build_analysis_prompt(contract_code),
        )
        .temperature(ANALYSIS_TEMPERATURE)
        .json();

        match self.complete_json::<ContractStructure>(request).await {
            Ok(structure) => {
                info!(
                    contract = structure.contract_name(),
                    functions = structure.functions.len(),
                    events = structure.events.len(),
                    "Contract structure analyzed"
                );
                structure
            }
            Err(e) => {
                warn!("Structure analysis failed, returning empty structure: {}", e);
                ContractStructure::unknown(format!("Error analyzing contract: {e}"))
            }
        }
    }

    async fn complete_json<T: DeserializeOwned>(
        &self,
        request: CompletionRequest,
    ) -> LlmResult<T> {
        let content = self.client.complete(request).await?;
        Ok(serde_json::from_str(extract_json_block(&content))?)
    }
}

/// Pull the code out of a markdown fence, preferring a ```solidity block
pub fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();

    let inner = if let Some((_, rest)) = content.split_once("```solidity") {
        rest
    } else if let Some((_, rest)) = content.split_once("```") {
        rest
    } else {
        return content;
    };

    inner.split("```").next().unwrap_or(inner).trim()
}
