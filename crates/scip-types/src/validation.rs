//! Contract validation results as reported by the auditing model

use serde::{Deserialize, Serialize};

/// Single finding reported against a contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// security | gas | best_practice | logical | system
    #[serde(rename = "type", default = "unknown_issue_type")]
    pub issue_type: String,
    /// high | medium | low
    #[serde(default = "default_severity")]
    pub severity: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub suggestion: String,
}

fn unknown_issue_type() -> String {
    "unknown".to_string()
}

fn default_severity() -> String {
    "low".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default)]
    pub issues: Vec<ValidationIssue>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    /// Result reported when the validation itself could not be carried out
    pub fn system_failure(reason: impl std::fmt::Display) -> Self {
        Self {
            is_valid: false,
            issues: vec![ValidationIssue {
                issue_type: "system".to_string(),
                severity: "high".to_string(),
                location: "validation".to_string(),
                description: format!("Failed to validate contract: {reason}"),
                suggestion: "Please try again or contact support.".to_string(),
            }],
            suggestions: Vec::new(),
        }
    }
}
