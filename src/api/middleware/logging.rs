//! Request/response logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

/// Logs each request and its outcome.
///
/// Runs inside `TraceLayer`, which owns the request span, so no span is opened here.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = route_path(&request);
    let request_id = header_value(&request, "x-request-id").unwrap_or_else(|| "-".to_string());
    let content_type = header_value(&request, header::CONTENT_TYPE.as_str());
    let content_length = header_value(&request, header::CONTENT_LENGTH.as_str());

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        content_type = content_type.as_deref().unwrap_or("-"),
        content_length = content_length.as_deref().unwrap_or("-"),
        "Incoming request"
    );

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            request_id = %request_id,
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            request_id = %request_id,
            "Request completed"
        );
    }

    response
}

/// Matched route pattern when available, so file names do not end up in logs as paths
pub(crate) fn route_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn header_value(request: &Request<Body>, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
