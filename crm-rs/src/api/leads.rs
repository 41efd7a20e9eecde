//! API endpoints for leads

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::auth::Claims;
use crate::api::handlers::{api_error, found, ApiRejection, AppState, JsonBody};
use crate::leads::types::UpdateLeadStatusRequest;
use crate::leads::{CreateLeadRequest, Lead, LeadStatus};

#[derive(Debug, Deserialize)]
pub struct LeadListQuery {
    pub status: Option<LeadStatus>,
}

#[derive(Debug, Deserialize)]
pub struct AssignCampaignRequest {
    pub campaign_id: Option<String>,
}

/// GET /api/leads
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Query(query): Query<LeadListQuery>,
) -> Result<Json<Vec<Lead>>, ApiRejection> {
    let leads = state
        .leads
        .list_leads(&claims.sub, query.status)
        .await
        .map_err(api_error)?;
    Ok(Json(leads))
}

/// POST /api/leads
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    JsonBody(req): JsonBody<CreateLeadRequest>,
) -> Result<(StatusCode, Json<Lead>), ApiRejection> {
    let lead = state
        .leads
        .create_lead(&claims.sub, req)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// GET /api/leads/:id
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Lead>, ApiRejection> {
    let lead = state
        .leads
        .get_lead(&claims.sub, &id)
        .await
        .map_err(api_error)?;
    Ok(Json(found(lead, "Lead", &id)?))
}

/// PATCH /api/leads/:id/status
pub async fn update_lead_status(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateLeadStatusRequest>,
) -> Result<Json<Lead>, ApiRejection> {
    let lead = state
        .leads
        .update_status(&claims.sub, &id, req.status)
        .await
        .map_err(api_error)?;
    Ok(Json(lead))
}

/// PATCH /api/leads/:id/campaign
pub async fn assign_campaign(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<AssignCampaignRequest>,
) -> Result<Json<Lead>, ApiRejection> {
    let lead = state
        .leads
        .assign_campaign(&claims.sub, &id, req.campaign_id.as_deref())
        .await
        .map_err(api_error)?;
    Ok(Json(lead))
}
