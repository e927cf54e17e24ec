//! Shared state and request/response bodies
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use scip_agent::AiService;
use scip_chain::BlockchainClient;
use scip_types::{ContractSummary, ValidationIssue, VisualizationPayload};
use scip_visualization::VisualizationService;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::store::{UserRecord, UserStore};

/// API state shared by every handler
#[derive(Clone)]
pub struct ApiState {
    pub settings: Arc<Settings>,
    pub ai: AiService,
    pub visualization: VisualizationService,
    pub blockchain: Arc<dyn BlockchainClient>,
    pub users: Arc<dyn UserStore>,
    pub audits: Arc<Mutex<HashMap<String, AuditResponse>>>,
}

impl ApiState {
    pub fn new(
        settings: Settings,
        ai: AiService,
        visualization: VisualizationService,
        blockchain: Arc<dyn BlockchainClient>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            ai,
            visualization,
            blockchain,
            users,
            audits: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

// Users

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

/// OAuth2 password form; `username` carries the email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub wallet_address: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            username: record.username,
            full_name: record.full_name,
            wallet_address: record.wallet_address,
            is_active: record.is_active,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WalletQuery {
    pub wallet_address: String,
}

// Contracts

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractCreate {
    pub description: String,
    pub contract_type: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

/// Outcome of a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContractCreateResponse {
    Success {
        contract_id: String,
        code: String,
        suggestions: Vec<String>,
    },
    Error {
        message: String,
        issues: Vec<ValidationIssue>,
        draft_code: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContractList {
    pub contracts: Vec<scip_types::StoredContract>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractVisualizeRequest {
    pub contract_code: String,
    #[serde(default = "default_visualization_type")]
    pub visualization_type: String,
}

fn default_visualization_type() -> String {
    "flowchart".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisualizationResponse {
    pub status: String,
    pub visualization_data: VisualizationPayload,
    pub contract_analysis: ContractSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeployResponse {
    pub status: String,
    pub transaction_hash: String,
    pub contract_address: String,
    pub deployment_cost: f64,
}

// Audits

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRequest {
    pub contract_id: String,
    #[serde(default)]
    pub contract_code: Option<String>,
    #[serde(default = "default_audit_type")]
    pub audit_type: String,
}

fn default_audit_type() -> String {
    AuditType::Security.to_string()
}

/// Kinds of audit; the tag is the last `-` segment of an audit id, so none contain `-`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuditType {
    Security,
    Gas,
    BestPractices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResponse {
    pub id: String,
    pub status: String,
    pub contract_id: String,
    pub audit_type: String,
    pub security_score: Option<u8>,
    #[serde(default)]
    pub vulnerabilities: Vec<ValidationIssue>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}
