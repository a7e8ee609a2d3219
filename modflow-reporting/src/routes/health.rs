use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use modflow_shared::{HealthCheck, HealthResponse, HealthStatus};
use std::sync::Arc;

use crate::AppState;

/// Health check covering the session runtime and the broker connection.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let mut checks = Vec::with_capacity(2);

    checks.push(match state.router.open_sessions().await {
        Some(_) => HealthCheck::healthy("session-router"),
        None => HealthCheck::unhealthy("session-router", "router task stopped"),
    });

    checks.push(match &state.rabbitmq {
        Some(client) if client.is_connected() => HealthCheck::healthy("rabbitmq"),
        Some(_) => HealthCheck::unhealthy("rabbitmq", "channel disconnected"),
        None => HealthCheck::healthy("rabbitmq"),
    });

    let response = HealthResponse::healthy("modflow-reporting", env!("CARGO_PKG_VERSION"))
        .with_checks(checks);

    let status = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

/// Returns Prometheus metrics.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|h| h.render())
        .unwrap_or_default()
}
