//! HTTP surface of the generation endpoint

use crate::error::GenerationError;
use crate::generation::{DraftGenerator, GeneratedMessage, GenerationPayload};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state
pub struct AppState {
    pub generator: Arc<dyn DraftGenerator>,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build the router serving `/health` and `/generate-message`
pub fn router(generator: Arc<dyn DraftGenerator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/generate-message", post(generate_message))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { generator }))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "outreach-ai",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// POST /generate-message
async fn generate_message(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<GenerationPayload>>,
) -> Result<Json<GeneratedMessage>, (StatusCode, Json<ErrorResponse>)> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let request = payload.validate().map_err(into_response_error)?;

    info!(
        "📥 Generation request: {} {} for {}",
        request.message_type, request.channel, request.lead_data.name
    );

    let message = state
        .generator
        .generate(&request)
        .await
        .map_err(into_response_error)?;

    Ok(Json(message))
}

fn into_response_error(error: GenerationError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match error {
        GenerationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        GenerationError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!("Generation request failed ({}): {}", status, error);
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MessageGenerator;
    use crate::llm::MockLlm;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(llm: MockLlm) -> Router {
        router(Arc::new(MessageGenerator::new(Arc::new(llm))))
    }

    async fn post_json(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate-message")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn valid_body(channel: &str) -> serde_json::Value {
        serde_json::json!({
            "leadData": {"name": "John Smith", "company": "Acme", "title": "CTO", "industry": "SaaS"},
            "channel": channel,
            "messageType": "cold_outreach",
            "tone": "professional"
        })
    }

    #[tokio::test]
    async fn test_generate_message_ok() {
        let (status, body) = post_json(
            app(MockLlm::replying(r#"{"subject":"S","content":"C"}"#)),
            valid_body("email"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"subject": "S", "content": "C"}));
    }

    #[tokio::test]
    async fn test_plain_text_answer_serializes_null_subject() {
        let (status, body) =
            post_json(app(MockLlm::replying("Hello world")), valid_body("sms")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"subject": null, "content": "Hello world"}));
    }

    #[tokio::test]
    async fn test_missing_fields_is_bad_request() {
        let (status, body) = post_json(
            app(MockLlm::new()),
            serde_json::json!({"channel": "email"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Missing required fields"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_500() {
        let (status, body) =
            post_json(app(MockLlm::failing("HTTP 500")), valid_body("email")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }
}
