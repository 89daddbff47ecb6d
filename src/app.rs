//! Shared state and the router.

use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::{HeaderName, HeaderValue},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::openapi::{self, SpecError};
use crate::routes;

const BANNER: &str = concat!("Team Roles API - v", env!("CARGO_PKG_VERSION"));

/// Header name the API has always sent alongside `Content-Type`.
pub const LEGACY_CONTENT_TYPE: &str = "contenttype";

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub api_doc: Arc<Value>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Builds the API description up front; an invalid description is an error.
    pub fn new(pool: SqlitePool, settings: Settings) -> Result<Self, SpecError> {
        let api_doc = openapi::document(&settings.server_url());
        openapi::validate(&api_doc)?;

        Ok(Self {
            pool,
            api_doc: Arc::new(api_doc),
            settings: Arc::new(settings),
        })
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Value> {
    fn from_ref(state: &AppState) -> Self {
        state.api_doc.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let docs = ServeDir::new(&state.settings.docs_dir);

    // JSON endpoints also carry the legacy `ContentType` header
    let api = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/swagger.json", get(routes::docs::swagger_spec))

        // Team endpoints
        .route("/teams", get(routes::teams::get_teams).post(routes::teams::create_team))
        .route("/team/{team}", get(routes::teams::get_team).delete(routes::teams::delete_team))

        // Team role endpoints
        .route("/team/assign/role", post(routes::team_roles::assign_role))
        .route("/team/{team}/roles", get(routes::team_roles::get_team_roles))

        // Role endpoints
        .route("/roles", get(routes::roles::get_roles).post(routes::roles::create_role))
        .route("/role/{role}", get(routes::roles::get_role).delete(routes::roles::delete_role))

        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(LEGACY_CONTENT_TYPE),
            HeaderValue::from_static("application/json"),
        ));

    Router::new()
        .route("/", get(|| async { BANNER }))
        .merge(api)

        // Static documentation page
        .nest_service("/docs", docs)

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
