//! SCIP API
//!
//! HTTP surface of the Smart Contract Intelligence Platform: user accounts,
//! LLM-backed contract generation, audits, visualization and deployment
//! through the blockchain service.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod store;
pub mod types;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers::*;
pub use crate::types::ApiState;

/// Create API router with all endpoints
pub fn create_router(state: ApiState) -> Router {
    let api = Router::new()
        // Users
        .route("/users/register", post(register_user))
        .route("/users/token", post(login_for_access_token))
        .route("/users/login", post(login))
        .route("/users/me", get(read_users_me))
        .route("/users/wallet", post(connect_wallet))
        // Contracts
        .route("/contracts/create", post(create_contract))
        .route("/contracts/list", get(list_contracts))
        .route("/contracts/visualize", post(visualize_contract))
        .route("/contracts/deploy/{contract_id}", post(deploy_contract))
        .route("/contracts/{contract_id}", get(get_contract))
        // Audits
        .route("/audit/contract", post(audit_contract))
        .route("/audit/{audit_id}", get(get_audit_result));

    let prefix = state.settings.api_prefix.trim_end_matches('/');
    let router = Router::new().route("/", get(health_check));
    let router = if prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(prefix, api)
    };

    router
        .layer(cors_layer(&state.settings.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins; `*` allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}
