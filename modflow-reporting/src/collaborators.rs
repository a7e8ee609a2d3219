//! Capabilities a report session needs from the outside world.
//!
//! Sessions only ever see these traits; production wiring lives in
//! [`crate::clients`] and [`crate::events`], tests use in-memory fakes.

use async_trait::async_trait;
use std::sync::Arc;

use modflow_shared::errors::AppResult;

use crate::taxonomy::AbuseType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: u64,
    pub guild_id: u64,
    pub name: String,
}

/// The message under report, resolved once from its link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: u64,
    pub author_name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user_id: u64,
    pub name: String,
}

/// Guild, channel, message and member lookups plus direct messages.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn get_guild(&self, guild_id: u64) -> AppResult<Option<Guild>>;

    async fn get_channel(&self, guild: &Guild, channel_id: u64) -> AppResult<Option<Channel>>;

    /// Fails with `ErrorCode::MessageNotFound` when the message is absent or deleted.
    async fn fetch_message(&self, channel: &Channel, message_id: u64) -> AppResult<TargetMessage>;

    async fn find_member(&self, guild_id: u64, name: &str) -> AppResult<Option<Member>>;

    async fn send_direct_message(&self, user_id: u64, text: &str) -> AppResult<()>;
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Raw abuse label for `text`, or `None` when the model has no opinion.
    async fn classify_abuse_type(&self, text: &str) -> AppResult<Option<String>>;

    fn normalize_abuse_type(&self, raw: Option<&str>) -> Option<AbuseType> {
        AbuseType::normalize(raw)
    }
}

/// Moderator-only channels, one per guild.
#[async_trait]
pub trait ModeratorChannels: Send + Sync {
    /// Fails with `ErrorCode::ModChannelMissing` when the guild has none.
    async fn send(&self, guild_id: u64, text: &str) -> AppResult<()>;
}

/// Finalized report handed to the moderation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationRequest {
    pub report_type: String,
    pub report_content: String,
    pub message_author: String,
    pub user_context: Option<String>,
    pub reporter_id: String,
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
}

#[async_trait]
pub trait Escalation: Send + Sync {
    async fn start_moderation_flow(&self, request: ModerationRequest) -> AppResult<()>;
}

/// Read-only collaborator handles shared by every session.
#[derive(Clone)]
pub struct Collaborators {
    pub platform: Arc<dyn Platform>,
    pub classifier: Arc<dyn Classifier>,
    pub mod_channels: Arc<dyn ModeratorChannels>,
    pub escalation: Arc<dyn Escalation>,
}
