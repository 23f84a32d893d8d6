use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::Store;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;

/// Per-server context handed to every handler through axum `State`
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: impl Store + 'static, config: AppConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.config.security
    }
}

pub fn app(state: AppState) -> Router {
    // Everything except the service descriptor and health probe needs a token
    let protected = Router::new()
        .merge(collection_request_routes())
        .merge(household_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(protected);

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn collection_request_routes() -> Router<AppState> {
    use handlers::collection_requests;

    Router::new()
        .route(
            "/collection_requests",
            get(collection_requests::list).post(collection_requests::create),
        )
        .route(
            "/collection_requests/:id",
            get(collection_requests::get)
                .patch(collection_requests::update)
                .delete(collection_requests::delete),
        )
}

fn household_routes() -> Router<AppState> {
    use handlers::households;

    Router::new()
        .route("/households", get(households::list).post(households::create))
        .route("/households/:id", get(households::get).delete(households::delete))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Waste Collection API",
            "version": version,
            "description": "Household pickup requests scheduled against collector dates",
            "endpoints": {
                "health": "/health (public)",
                "collection_requests": "/collection_requests[/:id] (admin, household, collector)",
                "households": "/households[/:id] (admin, household)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store().ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            )
        }
    }
}
