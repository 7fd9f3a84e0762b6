//! # Impact HTTP API Module
//!
//! This module implements the HTTP REST API server using axum. The server
//! is the application context: it owns the one in-memory session a UI
//! drives. State is lost on restart.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Model counts
//! - `GET|POST /screens` - List screens / create from a draft
//! - `PUT|DELETE /screens/{id}` - Rename / delete a screen
//! - `POST /screens/{id}/features` - Append a feature
//! - `PUT|DELETE /screens/{id}/features/{fid}` - Edit / delete a feature
//! - `POST /connections` - Record an impact connection
//! - `POST /quick-create` - Screen and feature named after a query
//! - `PUT /selection` - Move the selection, returns the form state
//! - `GET /forms`, `POST /forms/screen`, `POST /forms/feature` - Form state and submission
//! - `PUT /search` - Set the search term
//! - `GET /labels` - Label set for the query box
//! - `GET /graph`, `GET /graph.dot` - Projection as JSON / Graphviz
//! - `POST /import` - Import a JSON grid
//!
//! ## Security Configuration
//!
//! - `IMPACT_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `IMPACT_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `IMPACT_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    ConnectionRequest, HealthResponse, ImportResponse, LabelsResponse, MutationResponse,
    QuickCreateRequest, RenameScreenRequest, ScreensResponse, SearchRequest, SearchResponse,
    SelectionRequest, SelectionResponse, StatusResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post, put},
};
use impact_core::{ImpactError, Session};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the session.
#[derive(Clone)]
pub struct AppState {
    /// The single session; every handler goes through this lock.
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    /// Create new app state with a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer.
///
/// - `"*"`: allows all origins (development only)
/// - `None`: localhost only
/// - otherwise: the comma-separated origins that parse
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (IMPACT_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods(CORS_METHODS)
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route(
            "/screens",
            get(handlers::list_screens_handler).post(handlers::create_screen_handler),
        )
        .route(
            "/screens/{id}",
            put(handlers::rename_screen_handler).delete(handlers::delete_screen_handler),
        )
        .route(
            "/screens/{id}/features",
            post(handlers::add_feature_handler),
        )
        .route(
            "/screens/{id}/features/{fid}",
            put(handlers::update_feature_handler).delete(handlers::delete_feature_handler),
        )
        .route("/connections", post(handlers::connection_handler))
        .route("/quick-create", post(handlers::quick_create_handler))
        .route("/selection", put(handlers::selection_handler))
        .route("/forms", get(handlers::forms_handler))
        .route("/forms/screen", post(handlers::submit_screen_form_handler))
        .route("/forms/feature", post(handlers::submit_feature_form_handler))
        .route("/search", put(handlers::search_handler))
        .route("/labels", get(handlers::labels_handler))
        .route("/graph", get(handlers::graph_handler))
        .route("/graph.dot", get(handlers::graph_dot_handler))
        .route("/import", post(handlers::import_handler));

    match config.api_key.as_deref() {
        Some(key) => {
            tracing::info!("API key authentication enabled");
            let key: auth::ApiKey = Arc::from(key);
            router = router.layer(axum_middleware::from_fn_with_state(
                key,
                auth::api_key_auth_middleware,
            ));
        }
        None => {
            tracing::warn!(
                "API key authentication DISABLED - all endpoints are publicly accessible! \
                 Set IMPACT_API_KEY to enable authentication."
            );
        }
    }

    match create_rate_limiter(config.rate_limit) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(config.cors_origins.as_deref()))
                .layer(DefaultBodyLimit::max(config.body_limit_bytes)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(config: &ServerConfig, session: Session) -> Result<(), ImpactError> {
    let router = create_router(AppState::new(session), config);
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ImpactError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Impact HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ImpactError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
