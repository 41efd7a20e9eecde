//! API endpoints for message templates

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use outreach_ai::{Channel, LeadData};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::auth::Claims;
use crate::api::handlers::{api_error, found, ApiRejection, AppState, JsonBody};
use crate::error::CrmError;
use crate::templates::{
    CreateTemplateRequest, Template, TemplateRenderer, UpdateTemplateRequest,
};

/// Lead to preview with; the sample lead is used when both are absent
#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    pub lead_id: Option<String>,
    pub lead: Option<LeadData>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub subject: Option<String>,
    pub content: String,
    /// Tokens outside the placeholder vocabulary, left as typed
    pub unknown_placeholders: Vec<String>,
}

/// GET /api/templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<Json<Vec<Template>>, ApiRejection> {
    let templates = state
        .templates
        .list_templates(&claims.sub)
        .await
        .map_err(api_error)?;
    Ok(Json(templates))
}

/// GET /api/templates/channel/:channel
pub async fn list_templates_by_channel(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(channel): Path<String>,
) -> Result<Json<Vec<Template>>, ApiRejection> {
    let channel: Channel = channel
        .parse()
        .map_err(|e: outreach_ai::types::UnknownVariant| {
            api_error(CrmError::Validation(e.to_string()))
        })?;

    let templates = state
        .templates
        .list_templates_by_channel(&claims.sub, channel)
        .await
        .map_err(api_error)?;
    Ok(Json(templates))
}

/// POST /api/templates
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    JsonBody(req): JsonBody<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<Template>), ApiRejection> {
    let template = state
        .templates
        .create_template(&claims.sub, req)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// POST /api/templates/defaults
pub async fn create_default_templates(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<(StatusCode, Json<Vec<Template>>), ApiRejection> {
    let templates = state
        .templates
        .create_default_templates(&claims.sub)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(templates)))
}

/// GET /api/templates/:id
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Template>, ApiRejection> {
    let template = state
        .templates
        .get_template(&claims.sub, &id)
        .await
        .map_err(api_error)?;
    Ok(Json(found(template, "Template", &id)?))
}

/// PUT /api/templates/:id
pub async fn update_template(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateTemplateRequest>,
) -> Result<Json<Template>, ApiRejection> {
    let template = state
        .templates
        .update_template(&claims.sub, &id, req)
        .await
        .map_err(api_error)?;
    Ok(Json(template))
}

/// DELETE /api/templates/:id
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiRejection> {
    state
        .templates
        .delete_template(&claims.sub, &id)
        .await
        .map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/templates/:id/preview
pub async fn preview_template(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    Path(id): Path<String>,
    req: Option<Json<PreviewRequest>>,
) -> Result<Json<PreviewResponse>, ApiRejection> {
    let template = state
        .templates
        .get_template(&claims.sub, &id)
        .await
        .map_err(api_error)?;
    let template = found(template, "Template", &id)?;

    let req = req.map(|Json(r)| r).unwrap_or_default();
    let lead = match (req.lead_id, req.lead) {
        (Some(lead_id), _) => {
            let lead = state
                .leads
                .get_lead(&claims.sub, &lead_id)
                .await
                .map_err(api_error)?;
            found(lead, "Lead", &lead_id)?.lead_data()
        }
        (None, Some(lead)) => lead,
        (None, None) => TemplateRenderer::sample_lead(),
    };

    let rendered = TemplateRenderer::render(&template, &lead);
    let mut unknown = TemplateRenderer::unknown_placeholders(&template.content_template);
    if let Some(subject) = &template.subject_template {
        unknown.extend(TemplateRenderer::unknown_placeholders(subject));
        unknown.sort();
        unknown.dedup();
    }

    Ok(Json(PreviewResponse {
        subject: rendered.subject,
        content: rendered.content,
        unknown_placeholders: unknown,
    }))
}
