//! OpenAI-compatible chat completions client
//!
//! Works against api.openai.com or any server exposing the same
//! `/chat/completions` contract.

use super::{CompletionOptions, LlmEngine, LlmResponse, Message, MessageRole};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI LLM implementation
pub struct OpenAiLlm {
    model_name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiLlm {
    pub fn new(api_key: String, model_name: String) -> Self {
        Self {
            model_name,
            base_url: DEFAULT_API_BASE.to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Bound the whole request (connect + response) by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(self)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[async_trait::async_trait]
impl LlmEngine for OpenAiLlm {
    async fn generate(
        &self,
        messages: Vec<Message>,
        options: CompletionOptions,
    ) -> Result<LlmResponse> {
        debug!(
            "OpenAiLlm: Processing {} messages with model {}",
            messages.len(),
            self.model_name
        );

        let chat_messages = messages
            .into_iter()
            .map(|m| ChatMessage {
                role: match m.role {
                    MessageRole::System => "system".to_string(),
                    MessageRole::User => "user".to_string(),
                    MessageRole::Assistant => "assistant".to_string(),
                },
                content: Some(m.content),
            })
            .collect();

        let request = ChatRequest {
            model: &self.model_name,
            messages: chat_messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options
                .json_object
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("OpenAiLlm: Sending request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("provider request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("OpenAiLlm: Request failed with status {}: {}", status, error_text);
            anyhow::bail!("OpenAI API error: {}", status);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("provider returned an unreadable body")?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .context("provider returned no choices")?;

        let text = choice
            .message
            .content
            .context("provider returned an empty message")?;

        debug!("OpenAiLlm: Received {} bytes", text.len());

        Ok(LlmResponse {
            text,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_completion_request_shape() {
        let seen = Arc::new(Mutex::new(None::<serde_json::Value>));
        let captured = seen.clone();
        let app = Router::new().route(
            "/chat/completions",
            post(move |Json(body): Json<serde_json::Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(json!({
                        "choices": [{
                            "message": {"role": "assistant", "content": "{\"subject\":null,\"content\":\"Hi\"}"},
                            "finish_reason": "stop"
                        }]
                    }))
                }
            }),
        );
        let base = spawn_stub(app).await;

        let llm = OpenAiLlm::new("sk-test".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(format!("{}/", base));
        let response = llm
            .generate(
                vec![Message::system("sys"), Message::user("usr")],
                CompletionOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(response.text, "{\"subject\":null,\"content\":\"Hi\"}");
        assert_eq!(response.finish_reason, "stop");

        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_stub(app).await;

        let llm = OpenAiLlm::new("sk-test".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(base);
        let err = llm
            .generate(vec![Message::user("hi")], CompletionOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_error() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base = spawn_stub(app).await;

        let llm = OpenAiLlm::new("sk-test".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(base);
        let result = llm
            .generate(vec![Message::user("hi")], CompletionOptions::default())
            .await;

        assert!(result.is_err());
    }
}
