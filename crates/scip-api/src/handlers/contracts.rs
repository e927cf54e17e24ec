//! Contract generation, listing, visualization and deployment handlers
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use scip_types::StoredContract;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::types::*;

/// Fetch a contract the caller may read: 404 when unknown, 403 when private to someone else
pub(crate) async fn readable_contract(
    state: &ApiState,
    contract_id: &str,
    user_id: &str,
    forbidden_message: &str,
) -> ApiResult<StoredContract> {
    let contract = state
        .blockchain
        .get_contract(contract_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load contract: {e}")))?
        .ok_or_else(|| ApiError::not_found("Contract not found"))?;

    if !contract.is_readable_by(user_id) {
        return Err(ApiError::forbidden(forbidden_message));
    }
    Ok(contract)
}

/// Generate a contract from a description, validate it and store it when clean
#[instrument(skip(state, user, body), fields(user = %user.id, contract_type = %body.contract_type))]
pub async fn create_contract(
    State(state): State<ApiState>,
    AuthUser(user): AuthUser,
    Json(body): Json<ContractCreate>,
) -> ApiResult<(StatusCode, Json<ContractCreateResponse>)> {
    let code = state
        .ai
        .generate_contract_code(&body.description, &body.contract_type, &body.parameters)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create contract: {e}")))?;

    let validation = state.ai.validate_contract(&code).await;
    if !validation.is_valid {
        warn!(
            issues = validation.issues.len(),
            "Generated contract failed validation"
        );
        return Ok((
            StatusCode::CREATED,
            Json(ContractCreateResponse::Error {
                message: "Generated contract has issues".to_string(),
                issues: validation.issues,
                draft_code: code,
            }),
        ));
    }

    let metadata = json!({
        "description": body.description,
        "type": body.contract_type,
        "parameters": body.parameters,
    });
    let contract_id = state
        .blockchain
        .store_contract(&user.id, &code, metadata)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create contract: {e}")))?;

    info!("Created contract {}", contract_id);
    Ok((
        StatusCode::CREATED,
        Json(ContractCreateResponse::Success {
            contract_id,
            code,
            suggestions: validation.suggestions,
        }),
    ))
}

/// List the caller's contracts
pub async fn list_contracts(
    State(state): State<ApiState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ContractList>> {
    let contracts = state
        .blockchain
        .list_user_contracts(&user.id, query.skip, query.limit)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list contracts: {e}")))?;

    let total = contracts.len();
    Ok(Json(ContractList { contracts, total }))
}

pub async fn get_contract(
    State(state): State<ApiState>,
    AuthUser(user): AuthUser,
    Path(contract_id): Path<String>,
) -> ApiResult<Json<StoredContract>> {
    let contract = readable_contract(
        &state,
        &contract_id,
        &user.id,
        "You don't have permission to access this contract",
    )
    .await?;
    Ok(Json(contract))
}

/// Analyze contract source and render it in the requested style
#[instrument(skip(state, body), fields(visualization_type = %body.visualization_type))]
pub async fn visualize_contract(
    State(state): State<ApiState>,
    Json(body): Json<ContractVisualizeRequest>,
) -> Json<VisualizationResponse> {
    let structure = state.ai.analyze_contract_structure(&body.contract_code).await;
    let visualization_data = state
        .visualization
        .generate_visualization(&structure, &body.visualization_type)
        .await;

    Json(VisualizationResponse {
        status: "success".to_string(),
        visualization_data,
        contract_analysis: structure.summary,
    })
}

/// Deploy a contract; only its owner may do so
#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn deploy_contract(
    State(state): State<ApiState>,
    AuthUser(user): AuthUser,
    Path(contract_id): Path<String>,
) -> ApiResult<Json<DeployResponse>> {
    let contract = state
        .blockchain
        .get_contract(&contract_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load contract: {e}")))?
        .ok_or_else(|| ApiError::not_found("Contract not found"))?;

    if contract.owner_id != user.id {
        return Err(ApiError::forbidden(
            "You don't have permission to deploy this contract",
        ));
    }

    let deployment = state
        .blockchain
        .deploy_contract(&contract_id, &user.id)
        .await
        .map_err(|e| {
            error!("Deployment of {} failed: {}", contract_id, e);
            ApiError::internal(format!("Contract deployment failed: {e}"))
        })?;

    Ok(Json(DeployResponse {
        status: "success".to_string(),
        transaction_hash: deployment.tx_hash,
        contract_address: deployment.contract_address,
        deployment_cost: deployment.cost,
    }))
}
