//! API endpoints for campaigns

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::auth::Claims;
use crate::api::handlers::{api_error, found, ApiRejection, AppState, JsonBody};
use crate::campaigns::{Campaign, CreateCampaignRequest, UpdateCampaignRequest};

/// GET /api/campaigns
pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<Json<Vec<Campaign>>, ApiRejection> {
    let campaigns = state
        .campaigns
        .list_campaigns(&claims.sub)
        .await
        .map_err(api_error)?;
    Ok(Json(campaigns))
}

/// POST /api/campaigns
pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    JsonBody(req): JsonBody<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<Campaign>), ApiRejection> {
    let campaign = state
        .campaigns
        .create_campaign(&claims.sub, req)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// GET /api/campaigns/:id
pub async fn get_campaign(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiRejection> {
    let campaign = state
        .campaigns
        .get_campaign(&claims.sub, &id)
        .await
        .map_err(api_error)?;
    Ok(Json(found(campaign, "Campaign", &id)?))
}

/// PATCH /api/campaigns/:id
pub async fn update_campaign(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateCampaignRequest>,
) -> Result<Json<Campaign>, ApiRejection> {
    let campaign = state
        .campaigns
        .update_campaign(&claims.sub, &id, req)
        .await
        .map_err(api_error)?;
    Ok(Json(campaign))
}

/// DELETE /api/campaigns/:id
pub async fn delete_campaign(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiRejection> {
    state
        .campaigns
        .delete_campaign(&claims.sub, &id)
        .await
        .map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
