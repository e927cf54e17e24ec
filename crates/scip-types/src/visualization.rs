//! Visualization Payload Types
//!
//! Rendered output of the visualization pipeline. Payloads are tagged by a
//! `type` field so the frontend can pick a renderer without extra context.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::structure::{EventParameter, Parameter, ReturnType, Visibility};

/// Requested visualization style
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Display,
    EnumString,
    IntoStaticStr,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VisualizationStyle {
    #[default]
    Flowchart,
    Sequence,
    Interaction,
}

impl VisualizationStyle {
    /// Resolve a caller-supplied tag. Unknown and empty tags select the flowchart.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Contract,
    Function,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    FunctionCall,
    EventEmission,
}

/// Position in the abstract 2-D layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Kind-specific display metadata carried next to a node label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeDetails {
    Function {
        visibility: Visibility,
        modifiers: Vec<String>,
        parameters: Vec<Parameter>,
        returns: Vec<ReturnType>,
        description: String,
    },
    Event {
        parameters: Vec<EventParameter>,
    },
    Contract {
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(flatten)]
    pub details: NodeDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub data: NodeData,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowchartPayload {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    /// Mermaid `flowchart TD` source
    pub mermaid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePayload {
    pub actors: Vec<String>,
    pub interactions: Vec<String>,
    /// Mermaid `sequenceDiagram` source
    pub mermaid: String,
}

/// A named, described sequence of user-facing steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionPayload {
    pub contract_name: String,
    pub user_interactions: Vec<Scenario>,
    /// Names of public and external functions
    pub functions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualizationPayload {
    Flowchart(FlowchartPayload),
    Sequence(SequencePayload),
    Interaction(InteractionPayload),
}

impl VisualizationPayload {
    pub fn style(&self) -> VisualizationStyle {
        match self {
            VisualizationPayload::Flowchart(_) => VisualizationStyle::Flowchart,
            VisualizationPayload::Sequence(_) => VisualizationStyle::Sequence,
            VisualizationPayload::Interaction(_) => VisualizationStyle::Interaction,
        }
    }
}
