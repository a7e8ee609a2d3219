use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;

use modflow_shared::errors::{AppError, AppResult, ErrorCode};

use crate::collaborators::ModeratorChannels;

/// Moderator channels reached through per-guild incoming webhooks.
#[derive(Clone)]
pub struct WebhookModChannels {
    client: Client,
    webhooks: HashMap<u64, String>,
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

impl WebhookModChannels {
    pub fn new(client: Client, webhooks: HashMap<u64, String>) -> Self {
        Self { client, webhooks }
    }

    pub fn guild_count(&self) -> usize {
        self.webhooks.len()
    }
}

#[async_trait]
impl ModeratorChannels for WebhookModChannels {
    async fn send(&self, guild_id: u64, text: &str) -> AppResult<()> {
        let url = self.webhooks.get(&guild_id).ok_or_else(|| {
            AppError::new(
                ErrorCode::ModChannelMissing,
                format!("no moderator channel configured for guild {guild_id}"),
            )
        })?;

        let response = self
            .client
            .post(url)
            .json(&WebhookMessage { content: text })
            .send()
            .await
            .map_err(|e| AppError::new(ErrorCode::DeliveryFailed, format!("webhook post failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::new(
                ErrorCode::DeliveryFailed,
                format!("webhook returned {}", response.status()),
            ));
        }

        tracing::debug!(guild_id, "moderator summary posted");
        Ok(())
    }
}
