//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MetricsConfig;

const MAX_PATH_LABEL_CHARS: usize = 50;

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{12}")
        .expect("valid uuid pattern")
});
static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("valid numeric segment pattern"));

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the global Prometheus recorder; `None` when disabled or already installed
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("question_forge_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Router exposing the exposition text at `path`
pub fn create_metrics_router<S>(metrics: PrometheusMetrics, path: &str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Parameters for question generation metrics
pub struct GenerationMetricParams<'a> {
    pub mode: &'a str,
    pub model: &'a str,
    pub duration: Duration,
    pub success: bool,
}

/// Record one completed or failed question generation
pub fn record_generation(params: GenerationMetricParams) {
    let labels = [
        ("mode", params.mode.to_string()),
        ("model", params.model.to_string()),
        ("status", if params.success { "success" } else { "error" }.to_string()),
    ];

    counter!("question_generations_total", &labels).increment(1);
    histogram!("question_generation_duration_seconds", &labels)
        .record(params.duration.as_secs_f64());
}

/// Record how a model was chosen: `explicit`, `selected` or `fallback`
pub fn record_model_selection(outcome: &str, model: &str) {
    counter!(
        "model_selections_total",
        "outcome" => outcome.to_string(),
        "model" => model.to_string()
    )
    .increment(1);
}

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = UUID_PATTERN.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    path.chars().take(MAX_PATH_LABEL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        assert_eq!(
            sanitize_path("/download/550e8400-e29b-41d4-a716-446655440000"),
            "/download/{id}"
        );
        assert_eq!(
            sanitize_path("/download/questions_550e8400e29b41d4a716446655440000.tex"),
            "/download/questions_{id}.tex"
        );
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/outputs/123/file"), "/outputs/{id}/file");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/health"), "/health");
    }

    #[test]
    fn test_sanitize_path_truncates_on_char_boundary() {
        let path = format!("/download/{}", "س".repeat(60));
        let sanitized = sanitize_path(&path);
        assert_eq!(sanitized.chars().count(), MAX_PATH_LABEL_CHARS);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_http_request("GET", "/models", 200, Duration::from_millis(3));
        record_generation(GenerationMetricParams {
            mode: "from_content",
            model: "math",
            duration: Duration::from_secs(2),
            success: true,
        });
        record_model_selection("fallback", "deepseek");
    }
}
