use std::sync::Arc;

use crate::collaborators::{Member, Platform};

/// Outcome label that also triggers the appeal offer.
pub const POST_REMOVED: &str = "Post removed.";

/// Tells a reported user about a moderation decision.
///
/// Runs outside any report conversation, so nothing here returns an error:
/// lookup and delivery failures are logged and dropped.
#[derive(Clone)]
pub struct UserNotifier {
    platform: Arc<dyn Platform>,
}

impl UserNotifier {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }

    pub async fn notify_reported_user(
        &self,
        user_name: &str,
        guild_id: u64,
        outcome: &str,
        explanation: Option<&str>,
    ) {
        let member = match self.platform.find_member(guild_id, user_name).await {
            Ok(Some(member)) => member,
            Ok(None) => {
                tracing::warn!(user = %user_name, guild_id, "reported user not found in guild");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, user = %user_name, guild_id, "member lookup failed");
                return;
            }
        };

        if !self.deliver(&member, &decision_message(outcome, explanation)).await {
            return;
        }
        tracing::info!(user = %user_name, guild_id, outcome = %outcome, "reported user notified");

        if outcome == POST_REMOVED {
            self.offer_appeal(&member, explanation).await;
        }
    }

    async fn offer_appeal(&self, member: &Member, explanation: Option<&str>) {
        if self.deliver(member, &appeal_message(explanation)).await {
            tracing::debug!(user = %member.name, "appeal option offered");
        }
    }

    async fn deliver(&self, member: &Member, text: &str) -> bool {
        match self.platform.send_direct_message(member.user_id, text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, user = %member.name, "failed to DM user");
                false
            }
        }
    }
}

fn decision_message(outcome: &str, explanation: Option<&str>) -> String {
    let mut msg = format!("Your message was reviewed by moderators. Outcome: {outcome}.");
    if let Some(reason) = explanation {
        msg.push_str(&format!("\nReason: {reason}"));
    }
    msg.push_str("\nIf you believe this was a mistake, you may reply to this message to appeal.");
    msg
}

fn appeal_message(explanation: Option<&str>) -> String {
    let mut msg = String::from("Your post was removed by the moderation team.");
    if let Some(reason) = explanation {
        msg.push_str(&format!("\nReason: {reason}"));
    }
    msg.push_str(
        "\nTo appeal, reply to this message with `appeal` followed by why the decision should be reviewed.",
    );
    msg
}
