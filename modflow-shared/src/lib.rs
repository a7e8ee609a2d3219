//! Building blocks shared by the modflow services: error envelope, event
//! envelope, RabbitMQ publishing, tracing and metrics setup.

pub mod clients;
pub mod errors;
pub mod middleware;
pub mod types;

pub use errors::{AppError, AppResult, ErrorCode};
pub use types::*;
