//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use self::metrics::{
    create_metrics_router, init_metrics, record_generation, record_http_request,
    record_model_selection, GenerationMetricParams, PrometheusMetrics,
};
