//! API endpoints for drafting messages

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::auth::Claims;
use crate::api::handlers::{api_error, ApiRejection, AppState, JsonBody};
use crate::drafts::{ConfirmDraftRequest, Draft, DraftRequest};
use crate::messages::Message;

/// POST /api/drafts - produce a draft, nothing is stored
pub async fn create_draft(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    JsonBody(req): JsonBody<DraftRequest>,
) -> Result<Json<Draft>, ApiRejection> {
    let draft = state
        .drafts
        .draft(&claims.sub, req)
        .await
        .map_err(api_error)?;
    Ok(Json(draft))
}

/// POST /api/drafts/confirm - store a draft as a message
pub async fn confirm_draft(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    JsonBody(req): JsonBody<ConfirmDraftRequest>,
) -> Result<(StatusCode, Json<Message>), ApiRejection> {
    let message = state
        .drafts
        .confirm(&claims.sub, req)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(message)))
}
