//! Shared fixtures for router tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use scip_agent::prompts::{ANALYSIS_SYSTEM, GENERATION_SYSTEM, VALIDATION_SYSTEM};
use scip_agent::{AiService, CompletionRequest, LlmClient, LlmError, LlmResult};
use scip_api::{config::Settings, create_router, store::InMemoryUserStore, ApiState};
use scip_chain::{BlockchainClient, ChainError, ChainResult};
use scip_types::{DeploymentResult, StoredContract};
use scip_visualization::VisualizationService;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TOKEN_SOURCE: &str = "pragma solidity ^0.8.0;\ncontract Token {}";

/// Model stand-in that answers by the system prompt of each request
pub struct ScriptedLlm {
    pub code: Option<String>,
    pub validation: Value,
    pub analysis: Value,
    pub scenarios: Value,
}

impl Default for ScriptedLlm {
    fn default() -> Self {
        Self {
            code: Some(format!("```solidity\n{TOKEN_SOURCE}\n```")),
            validation: json!({
                "is_valid": true,
                "issues": [],
                "suggestions": ["Add NatSpec comments"]
            }),
            analysis: json!({
                "functions": [{
                    "name": "transfer",
                    "visibility": "external",
                    "modifiers": [],
                    "parameters": [{"name": "to", "type": "address"}],
                    "returns": ["bool"],
                    "description": "Moves tokens. Emits Transfer."
                }],
                "events": [{"name": "Transfer", "parameters": []}],
                "summary": {"contractName": "Token", "description": "ERC20 token", "data_flow": []}
            }),
            scenarios: json!({"scenarios": []}),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String> {
        let reply = match request.system.as_str() {
            GENERATION_SYSTEM => return self.code.clone().ok_or(LlmError::EmptyResponse),
            VALIDATION_SYSTEM => &self.validation,
            ANALYSIS_SYSTEM => &self.analysis,
            _ => &self.scenarios,
        };
        Ok(reply.to_string())
    }
}

/// In-memory blockchain service
#[derive(Default)]
pub struct MockChain {
    pub contracts: Mutex<HashMap<String, StoredContract>>,
    pub fail_deploy: bool,
}

impl MockChain {
    pub fn with_contract(self, id: &str, owner_id: &str, is_public: bool) -> Self {
        self.insert(id, owner_id, TOKEN_SOURCE, is_public);
        self
    }

    fn insert(&self, id: &str, owner_id: &str, code: &str, is_public: bool) {
        let contract = StoredContract {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            contract_code: code.to_string(),
            metadata: Default::default(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            is_public,
            deployed_address: None,
            deployment_info: None,
        };
        self.contracts
            .lock()
            .unwrap()
            .insert(id.to_string(), contract);
    }
}

#[async_trait::async_trait]
impl BlockchainClient for MockChain {
    async fn store_contract(
        &self,
        owner_id: &str,
        contract_code: &str,
        _metadata: Value,
    ) -> ChainResult<String> {
        let id = format!("c{}", self.contracts.lock().unwrap().len() + 1);
        self.insert(&id, owner_id, contract_code, false);
        Ok(id)
    }

    async fn get_contract(&self, contract_id: &str) -> ChainResult<Option<StoredContract>> {
        Ok(self.contracts.lock().unwrap().get(contract_id).cloned())
    }

    async fn list_user_contracts(
        &self,
        user_id: &str,
        skip: u32,
        limit: u32,
    ) -> ChainResult<Vec<StoredContract>> {
        let mut owned: Vec<StoredContract> = self
            .contracts
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.owner_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(owned
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn deploy_contract(
        &self,
        contract_id: &str,
        _deployer_id: &str,
    ) -> ChainResult<DeploymentResult> {
        if self.fail_deploy {
            return Err(ChainError::Status {
                status: 502,
                body: "node unavailable".to_string(),
            });
        }
        Ok(DeploymentResult {
            tx_hash: format!("0xtx{contract_id}"),
            contract_address: "0xdef".to_string(),
            cost: 0.01,
            block_number: 1,
        })
    }

    async fn verify_contract(&self, _: &str, _: &str, _: &str) -> ChainResult<bool> {
        Ok(true)
    }

    async fn get_contract_library(
        &self,
        _category: Option<&str>,
        _skip: u32,
        _limit: u32,
    ) -> ChainResult<Value> {
        Ok(json!({"templates": []}))
    }
}

pub struct TestApp {
    pub router: Router,
    pub chain: Arc<MockChain>,
}

pub fn test_app(llm: ScriptedLlm, chain: MockChain) -> TestApp {
    let llm: Arc<dyn LlmClient> = Arc::new(llm);
    let chain = Arc::new(chain);
    let state = ApiState::new(
        Settings::default(),
        AiService::new(llm.clone()),
        VisualizationService::new(llm),
        chain.clone(),
        Arc::new(InMemoryUserStore::new()),
    );
    TestApp {
        router: create_router(state),
        chain,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // Extractor rejections answer in plain text
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
        };
        (status, value)
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: Value,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Register an account and return its access token
    pub async fn signup(&self, username: &str) -> String {
        let email = format!("{username}@example.com");
        let (status, _) = self
            .post_json(
                "/api/users/register",
                json!({"email": email, "username": username, "password": "pa55word"}),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, token) = self
            .post_json(
                "/api/users/login",
                json!({"email": email, "password": "pa55word"}),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        token["access_token"].as_str().unwrap().to_string()
    }
}
