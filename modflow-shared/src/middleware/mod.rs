mod metrics_layer;
mod tracing_layer;

pub use metrics_layer::{init_metrics, metrics_middleware};
pub use tracing_layer::{init_tracing, LogFormat};
