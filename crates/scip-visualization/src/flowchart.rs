//! # Flowchart Generator
//!
//! Maps a [`ContractStructure`] into a node/edge graph plus a Mermaid
//! `flowchart TD` description.
//!
//! Layout is a pure function of input order: the contract sits at the origin,
//! functions alternate left/right two per row, events stack in a column to
//! the right. There is no collision avoidance, so large contracts overlap.
//! Node ids derive from member names; duplicate names produce duplicate ids.

use scip_types::{
    ContractStructure, EdgeKind, EventInfo, FlowchartPayload, FunctionInfo, NodeData,
    NodeDetails, NodeKind, Position, VisualEdge, VisualNode, Visibility,
};

use crate::matching::mentioned_in_sentences;

/// Id of the single contract node
pub const CONTRACT_NODE_ID: &str = "contract";

/// Horizontal distance between the contract and a function column
const COLUMN_OFFSET: i32 = 200;
/// Vertical position of the first function row
const FIRST_ROW_Y: i32 = 100;
/// Vertical distance between rows
const ROW_HEIGHT: i32 = 80;
/// Events live in their own column right of the functions
const EVENT_COLUMN_X: i32 = 2 * COLUMN_OFFSET;

pub fn function_node_id(name: &str) -> String {
    format!("function_{name}")
}

pub fn event_node_id(name: &str) -> String {
    format!("event_{name}")
}

/// Position of the `index`-th function: even indices left, odd right, two per row
pub fn function_position(index: usize) -> Position {
    let side = if index % 2 == 0 { -1 } else { 1 };
    let row = (index / 2) as i32;
    Position::new(COLUMN_OFFSET * side, FIRST_ROW_Y + ROW_HEIGHT * row)
}

pub fn event_position(index: usize) -> Position {
    Position::new(EVENT_COLUMN_X, FIRST_ROW_Y + ROW_HEIGHT * index as i32)
}

/// Whether the function's description suggests it emits the event
pub fn emits_event(function: &FunctionInfo, event: &EventInfo) -> bool {
    mentioned_in_sentences(&function.description, &event.name)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowchartGenerator;

impl FlowchartGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, structure: &ContractStructure) -> FlowchartPayload {
        FlowchartPayload {
            nodes: self.build_nodes(structure),
            edges: self.build_edges(structure),
            mermaid: self.build_mermaid(structure),
        }
    }

    fn build_nodes(&self, structure: &ContractStructure) -> Vec<VisualNode> {
        let mut nodes =
            Vec::with_capacity(1 + structure.functions.len() + structure.events.len());

        nodes.push(VisualNode {
            id: CONTRACT_NODE_ID.to_string(),
            kind: NodeKind::Contract,
            data: NodeData {
                label: structure.contract_name().to_string(),
                details: NodeDetails::Contract {
                    description: structure.summary.description().to_string(),
                },
            },
            position: Position::ORIGIN,
        });

        for (i, function) in structure.functions.iter().enumerate() {
            nodes.push(VisualNode {
                id: function_node_id(&function.name),
                kind: NodeKind::Function,
                data: NodeData {
                    label: function.name.clone(),
                    details: NodeDetails::Function {
                        visibility: function.visibility,
                        modifiers: function.modifiers.clone(),
                        parameters: function.parameters.clone(),
                        returns: function.returns.clone(),
                        description: function.description.clone(),
                    },
                },
                position: function_position(i),
            });
        }

        for (i, event) in structure.events.iter().enumerate() {
            nodes.push(VisualNode {
                id: event_node_id(&event.name),
                kind: NodeKind::Event,
                data: NodeData {
                    label: event.name.clone(),
                    details: NodeDetails::Event {
                        parameters: event.parameters.clone(),
                    },
                },
                position: event_position(i),
            });
        }

        nodes
    }

    fn build_edges(&self, structure: &ContractStructure) -> Vec<VisualEdge> {
        let mut edges: Vec<VisualEdge> = structure
            .functions
            .iter()
            .map(|function| VisualEdge {
                id: format!("edge_contract_to_{}", function.name),
                source: CONTRACT_NODE_ID.to_string(),
                target: function_node_id(&function.name),
                kind: EdgeKind::FunctionCall,
            })
            .collect();

        for function in &structure.functions {
            for event in &structure.events {
                if emits_event(function, event) {
                    edges.push(VisualEdge {
                        id: format!("edge_{}_to_{}", function.name, event.name),
                        source: function_node_id(&function.name),
                        target: event_node_id(&event.name),
                        kind: EdgeKind::EventEmission,
                    });
                }
            }
        }

        edges
    }

    fn build_mermaid(&self, structure: &ContractStructure) -> String {
        let mut lines = vec![
            "flowchart TD".to_string(),
            format!("    Contract[{}]", structure.contract_name()),
        ];

        for function in &structure.functions {
            let (open, close) = function_shape(function.visibility);
            let modifier_display = if function.modifiers.is_empty() {
                String::new()
            } else {
                format!("\\n{}", function.modifiers.join(" "))
            };

            lines.push(format!(
                "    {name}{open}{name}{modifier_display}{close}",
                name = function.name
            ));
            lines.push(format!("    Contract --> {}", function.name));
        }

        for event in &structure.events {
            lines.push(format!("    Event_{name}[/{name}/]", name = event.name));

            for function in &structure.functions {
                if emits_event(function, event) {
                    lines.push(format!("    {} -.-> Event_{}", function.name, event.name));
                }
            }
        }

        lines.join("\n")
    }
}

/// Mermaid bracket pair per visibility: external, public, everything else
fn function_shape(visibility: Visibility) -> (&'static str, &'static str) {
    match visibility {
        Visibility::External => (")", ")"),
        Visibility::Public => ("(", ")"),
        _ => ("[", "]"),
    }
}
