//! Health, liveness and readiness endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::api::types::Json;
use serde::Serialize;

use super::state::AppState;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check: the registry must have models; a missing output
/// directory only degrades since it is created on first save
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let checks = vec![check_registry(&state), check_output_directory(&state).await];

    let overall_status = checks
        .iter()
        .map(|check| check.status)
        .max_by_key(|status| match status {
            HealthStatus::Healthy => 0,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 2,
        })
        .unwrap_or(HealthStatus::Healthy);

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn check_registry(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    let (status, message) = match state.registry().candidates() {
        Ok(candidates) => (
            HealthStatus::Healthy,
            Some(format!("{} models registered", candidates.len())),
        ),
        Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
    };

    HealthCheck {
        name: "model_registry".to_string(),
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}

async fn check_output_directory(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    let (status, message) = match tokio::fs::metadata(&state.output_dir).await {
        Ok(meta) if meta.is_dir() => (HealthStatus::Healthy, None),
        Ok(_) => (
            HealthStatus::Unhealthy,
            Some(format!("{} is not a directory", state.output_dir.display())),
        ),
        Err(_) => (
            HealthStatus::Degraded,
            Some(format!("{} does not exist yet", state.output_dir.display())),
        ),
    };

    HealthCheck {
        name: "output_directory".to_string(),
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(!json.contains("checks"));
    }

    #[test]
    fn test_health_response_with_checks() {
        let response = HealthResponse {
            status: HealthStatus::Degraded,
            version: "1.0.0".to_string(),
            checks: Some(vec![
                HealthCheck {
                    name: "model_registry".to_string(),
                    status: HealthStatus::Healthy,
                    message: None,
                    latency_ms: Some(5),
                },
                HealthCheck {
                    name: "output_directory".to_string(),
                    status: HealthStatus::Degraded,
                    message: Some("outputs does not exist yet".to_string()),
                    latency_ms: Some(100),
                },
            ]),
            latency_ms: Some(105),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"degraded\""));
        assert!(json.contains("\"model_registry\""));
        assert!(json.contains("\"output_directory\""));
        assert!(json.contains("does not exist yet"));
    }
}
