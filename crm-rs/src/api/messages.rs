//! API endpoints for message records

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::auth::Claims;
use crate::api::handlers::{api_error, found, ApiRejection, AppState, JsonBody};
use crate::messages::{CreateMessageRequest, Message, MessageView, UpdateMessageStatusRequest};

#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    pub lead_id: Option<String>,
}

/// GET /api/messages, optionally narrowed with `?lead_id=`
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<Vec<MessageView>>, ApiRejection> {
    let messages = match query.lead_id {
        Some(lead_id) => {
            state
                .messages
                .list_messages_for_lead(&claims.sub, &lead_id)
                .await
        }
        None => state.messages.list_messages(&claims.sub).await,
    }
    .map_err(api_error)?;

    Ok(Json(messages))
}

/// POST /api/messages
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    JsonBody(req): JsonBody<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiRejection> {
    let message = state
        .messages
        .create_message(&claims.sub, req)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/messages/:id
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiRejection> {
    let message = state
        .messages
        .get_message(&claims.sub, &id)
        .await
        .map_err(api_error)?;
    Ok(Json(found(message, "Message", &id)?))
}

/// PATCH /api/messages/:id/status
pub async fn update_message_status(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateMessageStatusRequest>,
) -> Result<Json<Message>, ApiRejection> {
    let message = state
        .messages
        .update_status(&claims.sub, &id, req.status)
        .await
        .map_err(api_error)?;
    Ok(Json(message))
}
