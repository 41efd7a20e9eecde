//! API Server - HTTP server for the CRM REST API

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use outreach_ai::DraftGenerator;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::auth::{Claims, JwtConfig};
use crate::api::handlers::{self, ApiError, AppState};
use crate::api::{campaigns, drafts, leads, messages, templates};
use crate::campaigns::CampaignManager;
use crate::drafts::DraftService;
use crate::leads::LeadManager;
use crate::messages::MessageManager;
use crate::templates::TemplateManager;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    pub fn new(
        db: SqlitePool,
        generator: Arc<dyn DraftGenerator>,
        jwt_config: JwtConfig,
        addr: String,
    ) -> Self {
        let state = Arc::new(AppState {
            leads: LeadManager::new(db.clone()),
            campaigns: CampaignManager::new(db.clone()),
            templates: TemplateManager::new(db.clone()),
            messages: MessageManager::new(db.clone()),
            drafts: DraftService::new(db, generator),
            jwt_config,
        });

        Self { state, addr }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let public_routes = Router::new().route("/health", get(handlers::health));

        let protected_routes = Router::new()
            .route("/leads", get(leads::list_leads).post(leads::create_lead))
            .route("/leads/:id", get(leads::get_lead))
            .route("/leads/:id/status", patch(leads::update_lead_status))
            .route("/leads/:id/campaign", patch(leads::assign_campaign))
            .route(
                "/campaigns",
                get(campaigns::list_campaigns).post(campaigns::create_campaign),
            )
            .route(
                "/campaigns/:id",
                get(campaigns::get_campaign)
                    .patch(campaigns::update_campaign)
                    .delete(campaigns::delete_campaign),
            )
            .route(
                "/templates",
                get(templates::list_templates).post(templates::create_template),
            )
            .route("/templates/defaults", post(templates::create_default_templates))
            .route(
                "/templates/channel/:channel",
                get(templates::list_templates_by_channel),
            )
            .route(
                "/templates/:id",
                get(templates::get_template)
                    .put(templates::update_template)
                    .delete(templates::delete_template),
            )
            .route("/templates/:id/preview", post(templates::preview_template))
            .route(
                "/messages",
                get(messages::list_messages).post(messages::create_message),
            )
            .route("/messages/:id", get(messages::get_message))
            .route("/messages/:id/status", patch(messages::update_message_status))
            .route("/drafts", post(drafts::create_draft))
            .route("/drafts/confirm", post(drafts::confirm_draft))
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware,
            ));

        Router::new()
            .nest("/api", public_routes.merge(protected_routes))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// Authentication middleware - validates the bearer token
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        warn!("Missing or invalid Authorization header");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new("Missing or invalid Authorization header")),
        )
            .into_response();
    };

    match state.jwt_config.validate_token(token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            warn!("Invalid JWT token: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiError::new("Invalid or expired token")),
            )
                .into_response()
        }
    }
}

/// Extract Claims from request (for handlers)
#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiError>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(ApiError::new("Not authenticated")),
            ))
    }
}
