use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use modflow_shared::errors::{AppError, AppResult, ErrorCode};
use modflow_shared::types::api::ApiResponse;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    pub reporter_id: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Replies {
    pub replies: Vec<String>,
}

/// Direct message from a user to the bot; answers with the replies to send back.
pub async fn receive_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<InboundMessage>,
) -> AppResult<Json<ApiResponse<Replies>>> {
    if body.reporter_id.trim().is_empty() {
        return Err(AppError::Validation("reporter_id must not be empty".into()));
    }

    if !state.router.is_running() {
        return Err(AppError::new(
            ErrorCode::RuntimeUnavailable,
            "report sessions are not being processed",
        ));
    }

    let replies = state
        .router
        .handle_message(body.reporter_id.trim(), &body.content)
        .await;

    Ok(Json(ApiResponse::ok(Replies { replies })))
}
