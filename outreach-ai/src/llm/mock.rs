//! Mock LLM for testing
//!
//! Without a script the mock drafts a small JSON message from the
//! `Name:` / `Company:` lines of the user prompt, so the whole pipeline can
//! run offline. Scripts replay a fixed reply or a provider failure.

use super::{CompletionOptions, LlmEngine, LlmResponse, Message, MessageRole};
use anyhow::Result;
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone)]
enum Script {
    Draft,
    Reply(String),
    Fail(String),
}

/// Mock LLM implementation for testing
pub struct MockLlm {
    model_name: String,
    script: Script,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self {
            model_name: "mock-llm-v1".to_string(),
            script: Script::Draft,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `text`, verbatim
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            script: Script::Reply(text.into()),
            ..Self::new()
        }
    }

    /// Always fail as if the provider answered with an error status
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            script: Script::Fail(reason.into()),
            ..Self::new()
        }
    }

    /// Number of completions requested so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Conversation sent with the most recent completion
    pub fn last_messages(&self) -> Option<Vec<Message>> {
        self.calls
            .lock()
            .ok()
            .and_then(|calls| calls.last().cloned())
    }

    fn draft_from_prompt(prompt: &str) -> String {
        let field = |label: &str| {
            prompt
                .lines()
                .find_map(|line| line.trim().strip_prefix(label))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let name = field("Name:").unwrap_or_else(|| "there".to_string());
        let company = field("Company:").unwrap_or_else(|| "your team".to_string());

        serde_json::json!({
            "subject": format!("Quick question about {}", company),
            "content": format!(
                "Hi {},\n\nI came across {} and would love to share a few ideas.\n\nBest regards",
                name, company
            ),
        })
        .to_string()
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmEngine for MockLlm {
    async fn generate(
        &self,
        messages: Vec<Message>,
        _options: CompletionOptions,
    ) -> Result<LlmResponse> {
        debug!("MockLLM: Processing {} messages", messages.len());

        let user_message = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages);
        }

        let text = match &self.script {
            Script::Draft => Self::draft_from_prompt(&user_message),
            Script::Reply(text) => text.clone(),
            Script::Fail(reason) => anyhow::bail!("mock provider error: {}", reason),
        };

        Ok(LlmResponse {
            text,
            finish_reason: "stop".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
