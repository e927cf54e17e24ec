//! Blockchain service HTTP client
use std::time::Duration;

use reqwest::StatusCode;
use scip_types::{DeploymentResult, StoredContract};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::error::{ChainError, ChainResult};

/// Blockchain operations are slow; allow generous time per request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Contract storage, deployment and verification
#[async_trait::async_trait]
pub trait BlockchainClient: Send + Sync {
    /// Store a contract and return its id
    async fn store_contract(
        &self,
        owner_id: &str,
        contract_code: &str,
        metadata: serde_json::Value,
    ) -> ChainResult<String>;

    /// Fetch a contract; `None` when the service does not know the id
    async fn get_contract(&self, contract_id: &str) -> ChainResult<Option<StoredContract>>;

    async fn list_user_contracts(
        &self,
        user_id: &str,
        skip: u32,
        limit: u32,
    ) -> ChainResult<Vec<StoredContract>>;

    async fn deploy_contract(
        &self,
        contract_id: &str,
        deployer_id: &str,
    ) -> ChainResult<DeploymentResult>;

    /// Verify deployed source on a block explorer
    async fn verify_contract(
        &self,
        contract_address: &str,
        contract_code: &str,
        constructor_arguments: &str,
    ) -> ChainResult<bool>;

    /// Templates from the contract library, passed through untouched
    async fn get_contract_library(
        &self,
        category: Option<&str>,
        skip: u32,
        limit: u32,
    ) -> ChainResult<serde_json::Value>;
}

#[derive(Debug, Deserialize)]
struct StoreResponse {
    contract_id: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    contracts: Vec<StoredContract>,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    verified: bool,
}

/// Client for the Go contract service over HTTP
#[derive(Debug, Clone)]
pub struct HttpBlockchainClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpBlockchainClient {
    pub fn new(base_url: impl Into<String>) -> ChainResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ChainResult<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fail on non-success statuses, otherwise decode the JSON body
    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> ChainResult<R> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(ChainError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ChainError::invalid_response(e.to_string()))
    }
}

#[async_trait::async_trait]
impl BlockchainClient for HttpBlockchainClient {
    #[instrument(skip(self, contract_code, metadata))]
    async fn store_contract(
        &self,
        owner_id: &str,
        contract_code: &str,
        metadata: serde_json::Value,
    ) -> ChainResult<String> {
        let response = self
            .http_client
            .post(self.url("contracts"))
            .json(&json!({
                "owner_id": owner_id,
                "contract_code": contract_code,
                "metadata": metadata,
            }))
            .send()
            .await?;

        let stored: StoreResponse = Self::decode(response).await?;
        info!("Stored contract {}", stored.contract_id);
        Ok(stored.contract_id)
    }

    #[instrument(skip(self))]
    async fn get_contract(&self, contract_id: &str) -> ChainResult<Option<StoredContract>> {
        let response = self
            .http_client
            .get(self.url(&format!("contracts/{contract_id}")))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Contract {} not found", contract_id);
            return Ok(None);
        }

        Self::decode(response).await.map(Some)
    }

    #[instrument(skip(self))]
    async fn list_user_contracts(
        &self,
        user_id: &str,
        skip: u32,
        limit: u32,
    ) -> ChainResult<Vec<StoredContract>> {
        let response = self
            .http_client
            .get(self.url("contracts"))
            .query(&[
                ("owner_id", user_id.to_string()),
                ("skip", skip.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let list: ListResponse = Self::decode(response).await?;
        Ok(list.contracts)
    }

    #[instrument(skip(self))]
    async fn deploy_contract(
        &self,
        contract_id: &str,
        deployer_id: &str,
    ) -> ChainResult<DeploymentResult> {
        let response = self
            .http_client
            .post(self.url("deploy"))
            .json(&json!({
                "contract_id": contract_id,
                "deployer_id": deployer_id,
            }))
            .send()
            .await?;

        let deployment: DeploymentResult = Self::decode(response).await?;
        info!(
            tx_hash = %deployment.tx_hash,
            address = %deployment.contract_address,
            "Contract deployed"
        );
        Ok(deployment)
    }

    #[instrument(skip(self, contract_code, constructor_arguments))]
    async fn verify_contract(
        &self,
        contract_address: &str,
        contract_code: &str,
        constructor_arguments: &str,
    ) -> ChainResult<bool> {
        let response = self
            .http_client
            .post(self.url("verify"))
            .json(&json!({
                "contract_address": contract_address,
                "contract_code": contract_code,
                "constructor_arguments": constructor_arguments,
            }))
            .send()
            .await?;

        let verify: VerifyResponse = Self::decode(response).await?;
        Ok(verify.verified)
    }

    #[instrument(skip(self))]
    async fn get_contract_library(
        &self,
        category: Option<&str>,
        skip: u32,
        limit: u32,
    ) -> ChainResult<serde_json::Value> {
        let mut query = vec![("skip", skip.to_string()), ("limit", limit.to_string())];
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }

        let response = self
            .http_client
            .get(self.url("library"))
            .query(&query)
            .send()
            .await?;

        Self::decode(response).await
    }
}
