use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::{files, health, models, questions};
use crate::config::{AppConfig, ServerConfig};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router(
    state: AppState,
    config: &AppConfig,
    metrics: Option<PrometheusMetrics>,
) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Question generation
        .route("/generate", post(questions::generate_from_upload))
        .route("/generate/text", post(questions::generate_from_text))
        .route("/download/{*file}", get(files::download))
        .route("/models", get(models::list_models))
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state);

    if let Some(metrics) = metrics {
        router = router.merge(create_metrics_router(metrics, &config.metrics.path));
    }

    if let Some(dir) = config.server.static_dir.as_ref().filter(|dir| dir.is_dir()) {
        info!(directory = %dir.display(), "Serving static UI");
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Any origin when none are configured, otherwise only the listed ones
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
