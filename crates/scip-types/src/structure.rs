//! Contract Structure Types
//!
//! Normalized description of a smart contract as returned by the contract
//! analyzer. Every field is lenient on input because the analyzer is an LLM
//! and routinely omits keys; missing values fall back to empty defaults.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Fallback label used when the summary carries no contract name
pub const DEFAULT_CONTRACT_NAME: &str = "Contract";

/// Function or variable visibility
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Internal,
    External,
    /// Anything the analyzer reported that is not a Solidity visibility
    #[default]
    #[serde(other)]
    Unknown,
}

impl Visibility {
    /// Whether the member can be called from outside the contract
    pub fn is_callable(&self) -> bool {
        matches!(self, Visibility::Public | Visibility::External)
    }
}

/// Named, typed parameter of a function or modifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: String,
}

/// Return type tag.
///
/// Accepts both `"bool"` and `{"type": "bool"}` on input, always emits the
/// object form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReturnType {
    #[serde(rename = "type")]
    pub ty: String,
}

impl<'de> Deserialize<'de> for ReturnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Tag(String),
            Object {
                #[serde(rename = "type", default)]
                ty: String,
            },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Tag(ty) => ReturnType { ty },
            Raw::Object { ty } => ReturnType { ty },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub returns: Vec<ReturnType>,
    #[serde(default)]
    pub description: String,
}

impl FunctionInfo {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub constant: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: String,
    #[serde(default)]
    pub indexed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<EventParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierInfo {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// High-level summary produced alongside the structural breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractSummary {
    #[serde(rename = "contractName", default, skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_functionality: Option<String>,
    #[serde(default)]
    pub security_features: Vec<String>,
    /// Ordered, plain-English execution narrative
    #[serde(default)]
    pub data_flow: Vec<String>,
    /// Keys the analyzer returned that we do not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContractSummary {
    /// Contract name, or [`DEFAULT_CONTRACT_NAME`] when absent
    pub fn contract_name(&self) -> &str {
        self.contract_name.as_deref().unwrap_or(DEFAULT_CONTRACT_NAME)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Structural breakdown of a smart contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractStructure {
    #[serde(default)]
    pub functions: Vec<FunctionInfo>,
    #[serde(default)]
    pub variables: Vec<VariableInfo>,
    #[serde(default)]
    pub events: Vec<EventInfo>,
    #[serde(default)]
    pub modifiers: Vec<ModifierInfo>,
    #[serde(default)]
    pub inheritance: Vec<String>,
    #[serde(default)]
    pub summary: ContractSummary,
}

impl ContractStructure {
    pub fn contract_name(&self) -> &str {
        self.summary.contract_name()
    }

    /// Functions reachable from outside the contract (public or external), in input order
    pub fn callable_functions(&self) -> impl Iterator<Item = &FunctionInfo> {
        self.functions.iter().filter(|f| f.visibility.is_callable())
    }

    /// Placeholder returned when the analyzer cannot make sense of a contract
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            summary: ContractSummary {
                contract_name: Some("Unknown".to_string()),
                description: Some(reason.into()),
                main_functionality: Some("Unknown".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
