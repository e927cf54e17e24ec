//! # Interaction Generator
//!
//! Asks the language model for user interaction scenarios. The model is an
//! unreliable collaborator: one attempt is made under a timeout, and any
//! error, timeout or unparsable answer yields the single default scenario.

use std::sync::Arc;
use std::time::Duration;

use scip_agent::prompts::{ContractPromptTemplate, INTERACTION_SYSTEM};
use scip_agent::{extract_json_block, CompletionRequest, LlmClient};
use scip_types::{ContractStructure, InteractionPayload, Scenario};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

const SCENARIO_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_INTERACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Scenario returned whenever the model cannot provide usable ones
pub fn fallback_scenario() -> Scenario {
    Scenario {
        name: "Basic Interaction".to_string(),
        description: "User interacts with the main functions of the contract".to_string(),
        steps: vec![
            "User connects wallet".to_string(),
            "User calls contract function".to_string(),
            "User receives confirmation".to_string(),
        ],
    }
}

/// Decode scenarios from either `{"scenarios": [...]}` or a bare array.
///
/// Returns `None` for anything else, including an empty list.
pub fn parse_scenarios(content: &str) -> Option<Vec<Scenario>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ScenarioResponse {
        Wrapped { scenarios: Vec<Scenario> },
        List(Vec<Scenario>),
    }

    let scenarios = match serde_json::from_str::<ScenarioResponse>(extract_json_block(content)).ok()? {
        ScenarioResponse::Wrapped { scenarios } => scenarios,
        ScenarioResponse::List(scenarios) => scenarios,
    };

    (!scenarios.is_empty()).then_some(scenarios)
}

#[derive(Clone)]
pub struct InteractionGenerator {
    client: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl InteractionGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            timeout: DEFAULT_INTERACTION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn render(&self, structure: &ContractStructure) -> InteractionPayload {
        InteractionPayload {
            contract_name: structure.contract_name().to_string(),
            user_interactions: self.generate_scenarios(structure).await,
            functions: structure
                .callable_functions()
                .map(|function| function.name.clone())
                .collect(),
        }
    }

    #[instrument(skip_all, fields(contract = structure.contract_name()))]
    async fn generate_scenarios(&self, structure: &ContractStructure) -> Vec<Scenario> {
        let request = CompletionRequest::new(INTERACTION_SYSTEM, build_prompt(structure))
            .temperature(SCENARIO_TEMPERATURE)
            .json();

        let content = match tokio::time::timeout(self.timeout, self.client.complete(request)).await
        {
            Ok(Ok(content)) => content,
            Ok(Err(e)) => {
                warn!("Scenario generation failed, using fallback: {}", e);
                return vec![fallback_scenario()];
            }
            Err(_) => {
                warn!(
                    "Scenario generation timed out after {:?}, using fallback",
                    self.timeout
                );
                return vec![fallback_scenario()];
            }
        };

        match parse_scenarios(&content) {
            Some(scenarios) => {
                info!("Generated {} interaction scenarios", scenarios.len());
                scenarios
            }
            None => {
                warn!("Unparsable scenario response, using fallback");
                vec![fallback_scenario()]
            }
        }
    }
}

fn build_prompt(structure: &ContractStructure) -> String {
    let functions: Vec<serde_json::Value> = structure
        .callable_functions()
        .map(|function| {
            json!({
                "name": function.name,
                "visibility": function.visibility,
                "modifiers": function.modifiers,
                "parameters": function.parameters,
                "description": function.description,
            })
        })
        .collect();

    let summary_json =
        serde_json::to_string(&structure.summary).unwrap_or_else(|_| "{}".to_string());
    let functions_json = serde_json::Value::Array(functions).to_string();

    ContractPromptTemplate::build_interaction_prompt(&summary_json, &functions_json)
}
