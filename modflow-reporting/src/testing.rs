//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use modflow_shared::errors::{AppError, AppResult, ErrorCode};

use crate::collaborators::{
    Channel, Classifier, Collaborators, Escalation, Guild, Member, ModerationRequest,
    ModeratorChannels, Platform, TargetMessage,
};

#[derive(Default)]
pub struct FakePlatform {
    pub guilds: HashMap<u64, Guild>,
    pub channels: HashMap<u64, Channel>,
    pub messages: HashMap<(u64, u64), TargetMessage>,
    pub members: Vec<(u64, Member)>,
    pub fail_lookups: bool,
    pub fail_direct_messages: bool,
    pub sent_direct: Mutex<Vec<(u64, String)>>,
}

impl FakePlatform {
    /// Guild 1 / channel 2 / message 3 written by "troll".
    pub fn with_message(content: &str) -> Self {
        let mut platform = Self::default();
        platform.guilds.insert(1, Guild { id: 1, name: "home".into() });
        platform.channels.insert(2, Channel { id: 2, guild_id: 1, name: "general".into() });
        platform.messages.insert(
            (2, 3),
            TargetMessage {
                id: 3,
                channel_id: 2,
                guild_id: 1,
                author_name: "troll".into(),
                content: content.into(),
            },
        );
        platform
    }

    pub fn direct_messages(&self) -> Vec<(u64, String)> {
        self.sent_direct.lock().unwrap().clone()
    }

    fn transport_error(&self) -> AppError {
        AppError::new(ErrorCode::ServiceUnavailable, "platform unreachable")
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn get_guild(&self, guild_id: u64) -> AppResult<Option<Guild>> {
        if self.fail_lookups {
            return Err(self.transport_error());
        }
        Ok(self.guilds.get(&guild_id).cloned())
    }

    async fn get_channel(&self, guild: &Guild, channel_id: u64) -> AppResult<Option<Channel>> {
        Ok(self
            .channels
            .get(&channel_id)
            .filter(|c| c.guild_id == guild.id)
            .cloned())
    }

    async fn fetch_message(&self, channel: &Channel, message_id: u64) -> AppResult<TargetMessage> {
        self.messages
            .get(&(channel.id, message_id))
            .cloned()
            .ok_or_else(|| AppError::new(ErrorCode::MessageNotFound, "unknown message"))
    }

    async fn find_member(&self, guild_id: u64, name: &str) -> AppResult<Option<Member>> {
        if self.fail_lookups {
            return Err(self.transport_error());
        }
        Ok(self
            .members
            .iter()
            .find(|(g, m)| *g == guild_id && m.name == name)
            .map(|(_, m)| m.clone()))
    }

    async fn send_direct_message(&self, user_id: u64, text: &str) -> AppResult<()> {
        if self.fail_direct_messages {
            return Err(AppError::new(ErrorCode::DeliveryFailed, "cannot send messages to this user"));
        }
        self.sent_direct.lock().unwrap().push((user_id, text.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeClassifier {
    pub label: Option<String>,
    pub fail: bool,
    /// When set, each call waits for a `notify_one` before answering.
    pub hold: Option<Arc<Notify>>,
}

impl FakeClassifier {
    pub fn returning(label: Option<&str>) -> Self {
        Self { label: label.map(str::to_string), ..Default::default() }
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify_abuse_type(&self, _text: &str) -> AppResult<Option<String>> {
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        if self.fail {
            return Err(AppError::new(ErrorCode::ClassifierUnavailable, "model offline"));
        }
        Ok(self.label.clone())
    }
}

#[derive(Default)]
pub struct RecordingModChannels {
    pub posts: Mutex<Vec<(u64, String)>>,
    pub fail: bool,
}

#[async_trait]
impl ModeratorChannels for RecordingModChannels {
    async fn send(&self, guild_id: u64, text: &str) -> AppResult<()> {
        self.posts.lock().unwrap().push((guild_id, text.to_string()));
        if self.fail {
            return Err(AppError::new(ErrorCode::ModChannelMissing, "no moderator channel"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEscalation {
    pub requests: Mutex<Vec<ModerationRequest>>,
    pub fail: bool,
}

#[async_trait]
impl Escalation for RecordingEscalation {
    async fn start_moderation_flow(&self, request: ModerationRequest) -> AppResult<()> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(AppError::new(ErrorCode::EscalationFailed, "broker down"));
        }
        Ok(())
    }
}

/// A full collaborator set plus handles for inspecting what the session did.
pub struct Harness {
    pub platform: Arc<FakePlatform>,
    pub mod_channels: Arc<RecordingModChannels>,
    pub escalation: Arc<RecordingEscalation>,
    pub collaborators: Collaborators,
}

impl Harness {
    pub fn new(platform: FakePlatform, classifier: FakeClassifier) -> Self {
        Self::with_escalation(platform, classifier, RecordingEscalation::default())
    }

    pub fn with_escalation(
        platform: FakePlatform,
        classifier: FakeClassifier,
        escalation: RecordingEscalation,
    ) -> Self {
        Self::assemble(platform, classifier, RecordingModChannels::default(), escalation)
    }

    pub fn assemble(
        platform: FakePlatform,
        classifier: FakeClassifier,
        mod_channels: RecordingModChannels,
        escalation: RecordingEscalation,
    ) -> Self {
        let platform = Arc::new(platform);
        let mod_channels = Arc::new(mod_channels);
        let escalation = Arc::new(escalation);
        let collaborators = Collaborators {
            platform: platform.clone(),
            classifier: Arc::new(classifier),
            mod_channels: mod_channels.clone(),
            escalation: escalation.clone(),
        };
        Self { platform, mod_channels, escalation, collaborators }
    }

    /// Message "you are awful" at /1/2/3 with the given classifier label.
    pub fn classified(label: Option<&str>) -> Self {
        Self::new(FakePlatform::with_message("you are awful"), FakeClassifier::returning(label))
    }

    pub fn escalations(&self) -> Vec<ModerationRequest> {
        self.escalation.requests.lock().unwrap().clone()
    }

    pub fn mod_posts(&self) -> Vec<(u64, String)> {
        self.mod_channels.posts.lock().unwrap().clone()
    }
}
