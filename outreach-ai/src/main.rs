//! outreach-ai - generation endpoint
//!
//! Serves `POST /generate-message` in front of the configured LLM provider.

use outreach_ai::llm::{openai, LlmEngine, MockLlm, OpenAiLlm};
use outreach_ai::{server, MessageGenerator};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("outreach_ai=info,tower_http=info")),
        )
        .init();

    info!("🚀 Starting outreach-ai v{}", env!("CARGO_PKG_VERSION"));

    let use_mock = std::env::var("USE_MOCK_LLM")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    let llm: Arc<dyn LlmEngine> = match std::env::var("OPENAI_API_KEY") {
        Ok(api_key) if !use_mock => {
            let model =
                std::env::var("OPENAI_MODEL").unwrap_or_else(|_| openai::DEFAULT_MODEL.to_string());
            let base = std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| openai::DEFAULT_API_BASE.to_string());
            info!("🤖 Using OpenAI-compatible provider at {} with model {}", base, model);
            Arc::new(
                OpenAiLlm::new(api_key, model)
                    .with_base_url(base)
                    .with_timeout(Duration::from_secs(60))?,
            )
        }
        Ok(_) => {
            info!("🤖 Using Mock LLM");
            Arc::new(MockLlm::new())
        }
        Err(_) => {
            warn!("OPENAI_API_KEY not set, falling back to Mock LLM");
            Arc::new(MockLlm::new())
        }
    };

    info!("✅ LLM initialized: {}", llm.model_name());

    let app = server::router(Arc::new(MessageGenerator::new(llm)));

    let addr = std::env::var("OUTREACH_AI_ADDR").unwrap_or_else(|_| "0.0.0.0:8888".to_string());
    info!("🌐 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
