//! Application assembly
//!
//! Builds the full router: API routes, health check and the tower layers.

use axum::http::HeaderValue;
use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::ConfigError;

/// CORS policy; `None` allows any origin
pub fn cors_layer(allow_origin: Option<&str>) -> Result<CorsLayer, ConfigError> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match allow_origin {
        None => Ok(layer.allow_origin(Any)),
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .map_err(|_| ConfigError::InvalidValue("CORS_ALLOW_ORIGIN"))?;
            Ok(layer.allow_origin(origin))
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    // Layers run outermost-last: request id -> trace -> context -> logging -> handler
    let api_router = api::create_router()
        .layer(middleware::from_fn(api::middleware::logging_middleware))
        .layer(middleware::from_fn(api::middleware::context_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_router)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
