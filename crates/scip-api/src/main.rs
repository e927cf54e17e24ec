use std::sync::Arc;

use anyhow::{Context, Result};
use scip_agent::{AiService, OpenAiClient, OpenAiConfig};
use scip_api::{config::Settings, create_router, store::InMemoryUserStore, ApiState};
use scip_chain::HttpBlockchainClient;
use scip_visualization::VisualizationService;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env();

    // Initialize tracing
    let default_filter = if settings.debug {
        "scip_api=debug,tower_http=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {}", settings.project_name);
    if settings.uses_default_secret() {
        warn!("Using the development SECRET_KEY, set SECRET_KEY in production");
    }

    let llm = OpenAiClient::new(OpenAiConfig {
        base_url: settings.openai_base_url.clone(),
        api_key: settings.openai_api_key.clone(),
        model: settings.llm_model.clone(),
        timeout: settings.llm_timeout,
    })
    .context("Failed to create LLM client, is OPENAI_API_KEY set?")?;
    let llm = Arc::new(llm);

    let ai = AiService::new(llm.clone());
    let visualization =
        VisualizationService::new(llm).with_interaction_timeout(settings.interaction_timeout);
    let blockchain = HttpBlockchainClient::with_timeout(
        settings.blockchain_service_url.clone(),
        settings.blockchain_timeout,
    )
    .context("Failed to create blockchain client")?;
    info!("Blockchain service at {}", blockchain.base_url());

    let port = settings.port;
    let state = ApiState::new(
        settings,
        ai,
        visualization,
        Arc::new(blockchain),
        Arc::new(InMemoryUserStore::new()),
    );
    let app = create_router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
