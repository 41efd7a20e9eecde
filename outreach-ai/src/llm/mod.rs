//! LLM Engine abstraction

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod mock;
pub mod openai;

pub use mock::MockLlm;
pub use openai::OpenAiLlm;

/// LLM response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated text
    pub text: String,
    /// Finish reason (stop, length, etc.)
    pub finish_reason: String,
}

/// Message in conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Sampling parameters sent with every completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider to constrain its answer to a JSON object
    pub json_object: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
            json_object: true,
        }
    }
}

/// LLM Engine trait
#[async_trait::async_trait]
pub trait LlmEngine: Send + Sync {
    /// Generate a completion for the conversation
    ///
    /// Any transport failure or non-success status is an error.
    async fn generate(&self, messages: Vec<Message>, options: CompletionOptions)
        -> Result<LlmResponse>;

    /// Get model name
    fn model_name(&self) -> &str;
}
