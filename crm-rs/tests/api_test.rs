//! REST API tests driven through the router

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use crm_rs::api::{ApiServer, JwtConfig};
use crm_rs::storage;
use outreach_ai::llm::MockLlm;
use outreach_ai::MessageGenerator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "test-secret";
const OWNER: &str = "owner@example.com";

async fn app() -> Router {
    let pool = storage::connect("sqlite::memory:").await.unwrap();
    storage::init_schema(&pool).await.unwrap();

    let generator = Arc::new(MessageGenerator::new(Arc::new(MockLlm::replying(
        r#"{"subject":"Hello","content":"Generated body"}"#,
    ))));

    ApiServer::new(
        pool,
        generator,
        JwtConfig::new(SECRET.to_string(), 1),
        "127.0.0.1:0".to_string(),
    )
    .router()
}

fn token(owner: &str) -> String {
    JwtConfig::new(SECRET.to_string(), 1).create_token(owner).unwrap()
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    call_as(app, OWNER, method, uri, body).await
}

async fn call_as(
    app: &Router,
    owner: &str,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token(owner)));

    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app().await;

    let missing = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/leads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let forged = app
        .oneshot(
            Request::builder()
                .uri("/api/leads")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_lead_lifecycle() {
    let app = app().await;

    let (status, lead) = call(
        &app,
        Method::POST,
        "/api/leads",
        Some(json!({"name": "John Smith", "company": "TechCorp Inc"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lead["status"], "new");
    let id = lead["id"].as_str().unwrap().to_string();

    let (status, updated) = call(
        &app,
        Method::PATCH,
        &format!("/api/leads/{}/status", id),
        Some(json!({"status": "meeting"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "meeting");

    let (status, listed) = call(&app, Method::GET, "/api/leads?status=meeting", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = call_as(
        &app,
        "other@example.com",
        Method::GET,
        &format!("/api/leads/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::POST, "/api/leads", Some(json!({"name": " "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn test_template_preview_reports_unknown_placeholders() {
    let app = app().await;

    let (status, template) = call(
        &app,
        Method::POST,
        "/api/templates",
        Some(json!({
            "name": "Follow-up",
            "channel": "email",
            "message_type": "follow_up",
            "subject_template": "Re: {{previous_subject}}",
            "content_template": "Hi {{name}}, saw {{company}} in {{industry}}."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = template["id"].as_str().unwrap();

    let (status, preview) = call(
        &app,
        Method::POST,
        &format!("/api/templates/{}/preview", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["content"], "Hi John Smith, saw TechCorp Inc in SaaS.");
    assert_eq!(preview["subject"], "Re: {{previous_subject}}");
    assert_eq!(preview["unknown_placeholders"], json!(["previous_subject"]));

    let (status, by_channel) = call(&app, Method::GET, "/api/templates/channel/email", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_channel.as_array().unwrap().len(), 1);

    let (status, _) = call(&app, Method::GET, "/api/templates/channel/fax", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_default_templates_and_delete() {
    let app = app().await;

    let (status, created) = call(&app, Method::POST, "/api/templates/defaults", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = created.as_array().unwrap().clone();
    assert_eq!(created.len(), 5);

    let id = created[0]["id"].as_str().unwrap();
    let (status, _) = call(&app, Method::DELETE, &format!("/api/templates/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = call(&app, Method::GET, "/api/templates", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_draft_then_confirm() {
    let app = app().await;

    let (status, draft) = call(
        &app,
        Method::POST,
        "/api/drafts",
        Some(json!({
            "lead": {"name": "Jane", "company": "Acme"},
            "strategy": "generate",
            "channel": "email",
            "message_type": "cold_outreach",
            "tone": "friendly"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["subject"], "Hello");
    assert_eq!(draft["content"], "Generated body");
    assert_eq!(draft["ai_generated"], true);

    let (_, before) = call(&app, Method::GET, "/api/messages", None).await;
    assert!(before.as_array().unwrap().is_empty());

    let (status, message) = call(
        &app,
        Method::POST,
        "/api/drafts/confirm",
        Some(json!({ "draft": draft })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message["status"], "draft");
    let id = message["id"].as_str().unwrap();

    let (status, sent) = call(
        &app,
        Method::PATCH,
        &format!("/api/messages/{}/status", id),
        Some(json!({"status": "sent"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(sent["sent_at"].is_string());

    let (_, after) = call(&app, Method::GET, "/api/messages", None).await;
    assert_eq!(after.as_array().unwrap().len(), 1);
    assert_eq!(after[0]["content"], "Generated body");
}

#[tokio::test]
async fn test_message_without_content_is_bad_request() {
    let app = app().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({"channel": "sms", "message_type": "follow_up"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message content is required");

    let (_, listed) = call(&app, Method::GET, "/api/messages", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_channel_is_bad_request() {
    let app = app().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/templates",
        Some(json!({
            "name": "Fax blast",
            "channel": "fax",
            "message_type": "cold_outreach",
            "content_template": "Hi {{name}}"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("fax"));

    let (_, listed) = call(&app, Method::GET, "/api/templates", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_draft_for_nameless_lead_is_bad_request() {
    let app = app().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/drafts",
        Some(json!({
            "lead": {"company": "Acme"},
            "strategy": "generate",
            "channel": "email",
            "message_type": "cold_outreach"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/leads")
        .header(header::AUTHORIZATION, format!("Bearer {}", token(OWNER)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_campaign_crud() {
    let app = app().await;

    let (status, campaign) = call(
        &app,
        Method::POST,
        "/api/campaigns",
        Some(json!({"name": "Launch", "channels": ["email", "sms", "email"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(campaign["channels"], json!(["email", "sms"]));
    let id = campaign["id"].as_str().unwrap();

    let (status, updated) = call(
        &app,
        Method::PATCH,
        &format!("/api/campaigns/{}", id),
        Some(json!({"status": "paused"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "paused");

    let (status, _) = call(&app, Method::DELETE, &format!("/api/campaigns/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::GET, &format!("/api/campaigns/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
