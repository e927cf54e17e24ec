//! Contract records exchanged with the blockchain service

use serde::{Deserialize, Serialize};

/// Contract as stored by the blockchain service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredContract {
    pub id: String,
    pub owner_id: String,
    pub contract_code: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub deployed_address: Option<String>,
    #[serde(default)]
    pub deployment_info: Option<serde_json::Value>,
}

impl StoredContract {
    /// Owners always have access; everybody else only to public contracts
    pub fn is_readable_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id || self.is_public
    }
}

/// Outcome of an on-chain deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub tx_hash: String,
    pub contract_address: String,
    pub cost: f64,
    pub block_number: u64,
}
