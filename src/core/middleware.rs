//! HTTP middleware for CORS, request IDs and metrics.
//!
//! Layer order in the router (outermost first): CORS guard, HTTP trace,
//! request ID, then per-route metrics tracking.

use crate::core::logging::{
    generate_request_id, sanitize_request_id, REQUEST_ID, REQUEST_ID_HEADER,
};
use crate::core::metrics::get_metrics;
use axum::{
    extract::{MatchedPath, Request},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;

/// Methods advertised to browsers.
pub const CORS_ALLOW_METHODS: &str = "GET,OPTIONS,POST";

/// Request headers browsers may send.
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Add the permissive CORS headers to a response.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
}

/// CORS guard.
///
/// Every response carries the CORS headers. `OPTIONS` is answered with an
/// empty `200` before routing, whatever the path or request headers.
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        tracing::debug!(path = %request.uri().path(), "CORS preflight handled");
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    apply_cors_headers(response.headers_mut());
    response
}

/// Assign a request ID, scope it for logging and echo it as `x-request-id`.
///
/// A well-formed ID supplied by the caller is reused.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(sanitize_request_id)
        .unwrap_or_else(generate_request_id);

    let mut response = REQUEST_ID.scope(request_id.clone(), next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Middleware for tracking request metrics.
pub struct MetricsMiddleware;

impl MetricsMiddleware {
    /// Track metrics for incoming requests.
    ///
    /// Installed as a route layer so the matched route pattern is available
    /// as the endpoint label.
    pub async fn track_metrics(request: Request, next: Next) -> Response {
        let endpoint = request
            .extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| request.uri().path().to_string());
        let method = request.method().to_string();

        // Skip metrics endpoint itself to avoid recursion
        if endpoint == "/metrics" {
            return next.run(request).await;
        }

        let metrics = get_metrics();
        let active = metrics.active_requests.with_label_values(&[endpoint.as_str()]);
        active.inc();

        let start = Instant::now();
        let response = next.run(request).await;
        let duration = start.elapsed().as_secs_f64();

        active.dec();

        let status_code = response.status().as_u16().to_string();
        metrics
            .request_count
            .with_label_values(&[method.as_str(), endpoint.as_str(), status_code.as_str()])
            .inc();
        metrics
            .request_duration
            .with_label_values(&[method.as_str(), endpoint.as_str()])
            .observe(duration);

        tracing::info!(
            method = %method,
            endpoint = %endpoint,
            status = %status_code,
            duration_ms = (duration * 1000.0) as u64,
            "Request completed"
        );

        response
    }
}
