//! Health check handler
use axum::response::Json;

use crate::types::HealthResponse;

pub const SERVICE_NAME: &str = "smart-contract-intelligence-api";

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
