//! Builds the draft generator selected by configuration

use crate::config::{GenerationConfig, GenerationMode};
use crate::error::{CrmError, Result};
use outreach_ai::llm::{openai, CompletionOptions, MockLlm, OpenAiLlm};
use outreach_ai::{DraftGenerator, MessageGenerator, RemoteGenerator};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub fn from_config(config: &GenerationConfig) -> Result<Arc<dyn DraftGenerator>> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    let options = CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..CompletionOptions::default()
    };

    let generator: Arc<dyn DraftGenerator> = match config.mode {
        GenerationMode::Openai => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                CrmError::Config("generation.api_key is required in openai mode".to_string())
            })?;
            let base = config
                .api_base
                .clone()
                .unwrap_or_else(|| openai::DEFAULT_API_BASE.to_string());
            let llm = OpenAiLlm::new(api_key, config.model.clone())
                .with_base_url(base)
                .with_timeout(timeout)
                .map_err(|e| CrmError::Config(e.to_string()))?;
            Arc::new(MessageGenerator::new(Arc::new(llm)).with_options(options))
        }
        GenerationMode::Remote => {
            let endpoint = config.endpoint_url.clone().ok_or_else(|| {
                CrmError::Config("generation.endpoint_url is required in remote mode".to_string())
            })?;
            Arc::new(
                RemoteGenerator::new(endpoint)
                    .with_api_key(config.api_key.clone())
                    .with_timeout(timeout)
                    .map_err(|e| CrmError::Config(e.to_string()))?,
            )
        }
        GenerationMode::Mock => {
            Arc::new(MessageGenerator::new(Arc::new(MockLlm::new())).with_options(options))
        }
    };

    info!("Draft generation mode: {}", generator.describe());
    Ok(generator)
}
