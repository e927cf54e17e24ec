//! SCIP Visualization
//!
//! Turns an analyzed [`ContractStructure`] into one of three views:
//! a flowchart graph, a sequence diagram or a set of user interaction
//! scenarios. Every view is built fresh per call from its input.

pub mod flowchart;
pub mod interaction;
pub mod matching;
pub mod sequence;

use std::sync::Arc;
use std::time::Duration;

use scip_agent::LlmClient;
use scip_types::{ContractStructure, VisualizationPayload, VisualizationStyle};
use tracing::debug;

pub use flowchart::FlowchartGenerator;
pub use interaction::{fallback_scenario, InteractionGenerator};
pub use sequence::SequenceGenerator;

/// Dispatches a visualization request to the generator for its style
#[derive(Clone)]
pub struct VisualizationService {
    flowchart: FlowchartGenerator,
    sequence: SequenceGenerator,
    interaction: InteractionGenerator,
}

impl VisualizationService {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            flowchart: FlowchartGenerator::new(),
            sequence: SequenceGenerator::new(),
            interaction: InteractionGenerator::new(client),
        }
    }

    /// Bound the scenario generation call made for interaction views
    pub fn with_interaction_timeout(mut self, timeout: Duration) -> Self {
        self.interaction = self.interaction.with_timeout(timeout);
        self
    }

    /// Generate a visualization from a free-form style tag; unknown tags give a flowchart
    pub async fn generate_visualization(
        &self,
        structure: &ContractStructure,
        visualization_type: &str,
    ) -> VisualizationPayload {
        self.generate(structure, VisualizationStyle::from_tag(visualization_type))
            .await
    }

    pub async fn generate(
        &self,
        structure: &ContractStructure,
        style: VisualizationStyle,
    ) -> VisualizationPayload {
        debug!(%style, contract = structure.contract_name(), "Generating visualization");

        match style {
            VisualizationStyle::Flowchart => {
                VisualizationPayload::Flowchart(self.flowchart.render(structure))
            }
            VisualizationStyle::Sequence => {
                VisualizationPayload::Sequence(self.sequence.render(structure))
            }
            VisualizationStyle::Interaction => {
                VisualizationPayload::Interaction(self.interaction.render(structure).await)
            }
        }
    }
}
