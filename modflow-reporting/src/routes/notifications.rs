use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use modflow_shared::errors::{AppError, AppResult};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NotifyUserRequest {
    pub user_name: String,
    pub guild_id: u64,
    pub outcome: String,
    pub explanation: Option<String>,
}

/// Queue a moderation-decision DM for a reported user.
pub async fn notify_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NotifyUserRequest>,
) -> AppResult<StatusCode> {
    if body.user_name.trim().is_empty() || body.outcome.trim().is_empty() {
        return Err(AppError::Validation("user_name and outcome are required".into()));
    }

    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        notifier
            .notify_reported_user(
                &body.user_name,
                body.guild_id,
                &body.outcome,
                body.explanation.as_deref(),
            )
            .await;
    });

    Ok(StatusCode::ACCEPTED)
}
