use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod clients;
pub mod collaborators;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod link;
pub mod notifier;
pub mod routes;
pub mod session;
pub mod taxonomy;

#[cfg(test)]
mod testing;

use dispatch::RouterHandle;
use modflow_shared::clients::rabbitmq::RabbitMQClient;
use notifier::UserNotifier;

pub struct AppState {
    pub router: RouterHandle,
    pub notifier: UserNotifier,
    pub rabbitmq: Option<RabbitMQClient>,
    pub metrics_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
}

/// Register help text for the report counters and gauges.
pub fn describe_metrics() {
    metrics::describe_counter!("reports_started_total", "Report sessions opened");
    metrics::describe_counter!("reports_finished_total", "Report sessions closed, by outcome");
    metrics::describe_counter!("reports_escalated_total", "Reports handed to moderation, by report type");
    metrics::describe_counter!(
        "report_escalation_failures_total",
        "Escalations the moderation pipeline did not accept"
    );
    metrics::describe_gauge!("report_sessions_open", "Report conversations in progress");
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/messages", post(routes::messages::receive_message))
        .route("/notifications", post(routes::notifications::notify_user))
        .layer(axum::middleware::from_fn(modflow_shared::middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
