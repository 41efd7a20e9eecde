//! HTTP client for a remote generation endpoint

use crate::error::{GenerationError, Result};
use crate::generation::{DraftGenerator, GeneratedMessage, GenerationRequest};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Generator that delegates to `POST /generate-message` on another service
pub struct RemoteGenerator {
    endpoint_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

/// Response body with every field optional, checked after decoding
#[derive(Debug, Deserialize)]
struct EndpointResponse {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl RemoteGenerator {
    pub fn new(endpoint_url: String) -> Self {
        Self {
            endpoint_url,
            api_key: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }
}

#[async_trait::async_trait]
impl DraftGenerator for RemoteGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedMessage> {
        debug!("RemoteGenerator: POST {}", self.endpoint_url);

        let mut builder = self.client.post(&self.endpoint_url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Generation endpoint unreachable: {}", e);
            GenerationError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generation endpoint answered {}: {}", status, body);
            return Err(GenerationError::Unavailable(format!(
                "generation endpoint returned {}",
                status
            )));
        }

        let body: EndpointResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Unavailable(format!("unreadable response: {}", e)))?;

        let content = body.content.ok_or_else(|| {
            GenerationError::Unavailable("response has no content".to_string())
        })?;

        Ok(GeneratedMessage {
            subject: body.subject,
            content,
        })
    }

    fn describe(&self) -> String {
        format!("remote:{}", self.endpoint_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Channel, LeadData, MessageType, Tone};
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/generate-message", addr)
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            lead_data: LeadData::new("John Smith").with_company("Acme"),
            channel: Channel::Email,
            message_type: MessageType::FollowUp,
            tone: Tone::Professional,
            custom_prompt: None,
        }
    }

    #[tokio::test]
    async fn test_remote_sends_camel_case_body() {
        let app = Router::new().route(
            "/generate-message",
            post(|Json(body): Json<serde_json::Value>| async move {
                Json(json!({
                    "subject": body["leadData"]["company"],
                    "content": body["messageType"],
                }))
            }),
        );
        let url = spawn_stub(app).await;

        let message = RemoteGenerator::new(url).generate(&request()).await.unwrap();

        assert_eq!(message.subject.as_deref(), Some("Acme"));
        assert_eq!(message.content, "follow_up");
    }

    #[tokio::test]
    async fn test_remote_tolerates_missing_subject() {
        let app = Router::new().route(
            "/generate-message",
            post(|| async { Json(json!({ "content": "Hi" })) }),
        );
        let url = spawn_stub(app).await;

        let message = RemoteGenerator::new(url).generate(&request()).await.unwrap();

        assert_eq!(message.subject, None);
        assert_eq!(message.content, "Hi");
    }

    #[tokio::test]
    async fn test_remote_error_status_is_unavailable() {
        let app = Router::new().route(
            "/generate-message",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "OpenAI API error: 500" })),
                )
            }),
        );
        let url = spawn_stub(app).await;

        let result = RemoteGenerator::new(url).generate(&request()).await;

        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_remote_body_without_content_is_unavailable() {
        let app = Router::new().route(
            "/generate-message",
            post(|| async { Json(json!({ "unexpected": true })) }),
        );
        let url = spawn_stub(app).await;

        let result = RemoteGenerator::new(url).generate(&request()).await;

        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }
}
