//! Shared API state, error mapping and health check

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, warn};

use crate::api::auth::JwtConfig;
use crate::campaigns::CampaignManager;
use crate::drafts::DraftService;
use crate::error::CrmError;
use crate::leads::LeadManager;
use crate::messages::MessageManager;
use crate::templates::TemplateManager;

/// Shared application state
pub struct AppState {
    pub leads: LeadManager,
    pub campaigns: CampaignManager,
    pub templates: TemplateManager,
    pub messages: MessageManager,
    pub drafts: DraftService,
    pub jwt_config: JwtConfig,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

pub type ApiRejection = (StatusCode, Json<ApiError>);

/// Map a domain error onto a status code and `{error}` body
pub fn api_error(err: CrmError) -> ApiRejection {
    let status = match &err {
        CrmError::Validation(_) => StatusCode::BAD_REQUEST,
        CrmError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CrmError::NotFound(_) => StatusCode::NOT_FOUND,
        CrmError::GenerationUnavailable(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }

    let message = match err {
        CrmError::Validation(msg)
        | CrmError::Unauthorized(msg)
        | CrmError::NotFound(msg)
        | CrmError::GenerationUnavailable(msg) => msg,
        other => other.to_string(),
    };

    (status, Json(ApiError { error: message }))
}

/// JSON request body whose decoding failures answer 400 with an `{error}` body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(api_error(CrmError::Validation(rejection.body_text()))),
        }
    }
}

/// Turn a missing record into a 404
pub fn found<T>(value: Option<T>, what: &str, id: &str) -> Result<T, ApiRejection> {
    value.ok_or_else(|| api_error(CrmError::NotFound(format!("{} not found: {}", what, id))))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "crm-rs",
        version: env!("CARGO_PKG_VERSION"),
    })
}
