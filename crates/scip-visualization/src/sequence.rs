//! # Sequence Diagram Generator
//!
//! Renders the contract's data flow narrative as a Mermaid `sequenceDiagram`
//! between three fixed actors: the user, the contract and the blockchain.

use scip_types::{ContractStructure, FunctionInfo, SequencePayload};

use crate::matching::contains_ignore_case;

pub const USER_ACTOR: &str = "User";
pub const BLOCKCHAIN_ACTOR: &str = "Blockchain";

/// Steps synthesized when the summary carries no data flow
const MAX_SYNTHESIZED_STEPS: usize = 3;

/// Modifiers that imply a state change worth showing on chain
const STATE_CHANGING_MODIFIERS: [&str; 2] = ["payable", "nonReentrant"];

/// How a data flow step is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Call,
    Emit,
    Check,
    Other,
}

impl StepKind {
    /// Keyword classification, first match wins in declaration order
    pub fn classify(step: &str) -> Self {
        let step = step.to_lowercase();
        if step.contains("call") {
            StepKind::Call
        } else if step.contains("emit") || step.contains("event") {
            StepKind::Emit
        } else if step.contains("check") || step.contains("verify") {
            StepKind::Check
        } else {
            StepKind::Other
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceGenerator;

impl SequenceGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, structure: &ContractStructure) -> SequencePayload {
        let contract_name = structure.contract_name();
        let main_functions: Vec<&FunctionInfo> = structure.callable_functions().collect();
        let interactions = interaction_steps(structure, &main_functions);
        let mermaid = render_mermaid(contract_name, &interactions, &main_functions);

        SequencePayload {
            actors: vec![
                USER_ACTOR.to_string(),
                contract_name.to_string(),
                BLOCKCHAIN_ACTOR.to_string(),
            ],
            interactions,
            mermaid,
        }
    }
}

/// The summary's data flow verbatim, or one "User calls" step per main function
fn interaction_steps(structure: &ContractStructure, main_functions: &[&FunctionInfo]) -> Vec<String> {
    if !structure.summary.data_flow.is_empty() {
        return structure.summary.data_flow.clone();
    }

    main_functions
        .iter()
        .take(MAX_SYNTHESIZED_STEPS)
        .map(|function| format!("User calls {}", function.name))
        .collect()
}

fn render_mermaid(contract_name: &str, steps: &[String], main_functions: &[&FunctionInfo]) -> String {
    let mut lines = vec![
        "sequenceDiagram".to_string(),
        "    participant U as User".to_string(),
        format!("    participant C as {contract_name}"),
        "    participant B as Blockchain".to_string(),
    ];

    for (i, step) in steps.iter().enumerate() {
        match StepKind::classify(step) {
            StepKind::Call => {
                // A call step naming no known function draws nothing
                let called = main_functions
                    .iter()
                    .find(|function| contains_ignore_case(step, &function.name));

                if let Some(function) = called {
                    lines.push(format!("    U->>C: {}()", function.name));
                    if STATE_CHANGING_MODIFIERS
                        .iter()
                        .any(|modifier| function.has_modifier(modifier))
                    {
                        lines.push("    C->>B: Update state".to_string());
                        lines.push("    B-->>C: Confirmation".to_string());
                    }
                    lines.push("    C-->>U: Return result".to_string());
                }
            }
            StepKind::Emit => lines.push("    C->>B: Emit event".to_string()),
            StepKind::Check => lines.push("    C->>C: Internal validation".to_string()),
            StepKind::Other => {
                lines.push(format!("    U->>C: Interaction {}", i + 1));
                lines.push("    C-->>U: Response".to_string());
            }
        }
    }

    lines.join("\n")
}
