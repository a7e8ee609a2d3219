use metrics::counter;

use crate::collaborators::{Collaborators, ModerationRequest, TargetMessage};
use crate::link::{parse_message_link, MessageLink};
use crate::taxonomy::{
    AbuseType, HealthCategory, MenuOption, MisinfoCategory, NewsCategory, SpecificCategory,
};

use super::prompts;
use super::state::{PendingReport, ReportOutcome, State};

/// Which lookup step failed while resolving a message link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolveFailure {
    Guild,
    Channel,
    Message,
}

impl ResolveFailure {
    fn reply(self) -> &'static str {
        match self {
            Self::Guild => prompts::GUILD_NOT_FOUND,
            Self::Channel => prompts::CHANNEL_NOT_FOUND,
            Self::Message => prompts::MESSAGE_NOT_FOUND,
        }
    }
}

fn is_keyword(text: &str, keyword: &str) -> bool {
    text.trim().eq_ignore_ascii_case(keyword)
}

fn replies<const N: usize>(lines: [&str; N]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// One reporter's report conversation.
///
/// Calls to [`ReportSession::handle_message`] must be serialized by the
/// owner; see [`crate::dispatch`].
pub struct ReportSession {
    reporter_id: String,
    state: State,
    target: Option<TargetMessage>,
    abuse_type: Option<AbuseType>,
    misinfo_category: Option<MisinfoCategory>,
    specific_category: Option<SpecificCategory>,
    pending_report: Option<PendingReport>,
    user_context: Option<String>,
    outcome: Option<ReportOutcome>,
    collaborators: Collaborators,
}

impl ReportSession {
    pub fn new(reporter_id: impl Into<String>, collaborators: Collaborators) -> Self {
        let reporter_id = reporter_id.into();
        counter!("reports_started_total").increment(1);
        tracing::debug!(reporter = %reporter_id, "report session created");

        Self {
            reporter_id,
            state: State::ReportStart,
            target: None,
            abuse_type: None,
            misinfo_category: None,
            specific_category: None,
            pending_report: None,
            user_context: None,
            outcome: None,
            collaborators,
        }
    }

    pub fn reporter_id(&self) -> &str {
        &self.reporter_id
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn report_complete(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn outcome(&self) -> Option<ReportOutcome> {
        self.outcome
    }

    pub fn target(&self) -> Option<&TargetMessage> {
        self.target.as_ref()
    }

    pub fn abuse_type(&self) -> Option<AbuseType> {
        self.abuse_type
    }

    pub fn misinfo_category(&self) -> Option<MisinfoCategory> {
        self.misinfo_category
    }

    pub fn specific_category(&self) -> Option<SpecificCategory> {
        self.specific_category
    }

    pub fn pending_report(&self) -> Option<&PendingReport> {
        self.pending_report.as_ref()
    }

    pub fn user_context(&self) -> Option<&str> {
        self.user_context.as_deref()
    }

    /// Feed one inbound message and return the replies, in order.
    pub async fn handle_message(&mut self, text: &str) -> Vec<String> {
        if is_keyword(text, prompts::CANCEL_KEYWORD) {
            return self.cancel();
        }

        match self.state {
            State::ReportStart => {
                self.advance(State::AwaitingMessage);
                replies([prompts::ONBOARDING])
            }
            State::AwaitingMessage => self.identify_message(text).await,
            State::MessageIdentified => self.classify_target().await,
            State::AwaitingUserConfirmation => self.confirm_classification(text),
            State::AwaitingAbuseType => self.choose_abuse_type(text),
            State::AwaitingMisinfoCategory => self.choose_misinfo_category(text).await,
            State::AwaitingHealthCategory => self.choose_health_category(text).await,
            State::AwaitingNewsCategory => self.choose_news_category(text).await,
            State::AwaitingContextConfirmation => self.confirm_context(text).await,
            State::AwaitingContextText => self.receive_context(text).await,
            State::ReportComplete => replies([prompts::ALREADY_CLOSED]),
        }
    }

    fn cancel(&mut self) -> Vec<String> {
        if !self.state.is_terminal() {
            self.pending_report = None;
            self.finish(ReportOutcome::Cancelled);
        }
        replies([prompts::CANCELLED])
    }

    async fn identify_message(&mut self, text: &str) -> Vec<String> {
        let Some(link) = parse_message_link(text) else {
            return replies([prompts::LINK_UNREADABLE]);
        };

        match self.resolve(link).await {
            Ok(message) => {
                self.target = Some(message);
                self.advance(State::MessageIdentified);
                self.classify_target().await
            }
            Err(failure) => {
                tracing::debug!(
                    reporter = %self.reporter_id,
                    guild_id = link.guild_id,
                    channel_id = link.channel_id,
                    message_id = link.message_id,
                    failure = ?failure,
                    "message link did not resolve"
                );
                replies([failure.reply()])
            }
        }
    }

    async fn resolve(&self, link: MessageLink) -> Result<TargetMessage, ResolveFailure> {
        let platform = &self.collaborators.platform;

        let guild = match platform.get_guild(link.guild_id).await {
            Ok(Some(guild)) => guild,
            Ok(None) => return Err(ResolveFailure::Guild),
            Err(e) => {
                tracing::warn!(error = %e, guild_id = link.guild_id, "guild lookup failed");
                return Err(ResolveFailure::Guild);
            }
        };

        let channel = match platform.get_channel(&guild, link.channel_id).await {
            Ok(Some(channel)) => channel,
            Ok(None) => return Err(ResolveFailure::Channel),
            Err(e) => {
                tracing::warn!(error = %e, channel_id = link.channel_id, "channel lookup failed");
                return Err(ResolveFailure::Channel);
            }
        };

        platform
            .fetch_message(&channel, link.message_id)
            .await
            .map_err(|e| {
                if !e.is_not_found() {
                    tracing::warn!(error = %e, message_id = link.message_id, "message fetch failed");
                }
                ResolveFailure::Message
            })
    }

    /// Classify the resolved target and either ask for confirmation or fall
    /// back to the manual menu.
    async fn classify_target(&mut self) -> Vec<String> {
        let Some(message) = self.target.clone() else {
            return self.abandon("no target message while classifying");
        };

        let classifier = &self.collaborators.classifier;
        let raw = match classifier.classify_abuse_type(&message.content).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, reporter = %self.reporter_id, "classification failed, asking reporter");
                None
            }
        };
        let tentative = classifier.normalize_abuse_type(raw.as_deref());

        let mut out = vec![prompts::FOUND_MESSAGE.to_string(), prompts::quote(&message)];
        match tentative {
            Some(abuse_type) => {
                self.abuse_type = Some(abuse_type);
                self.advance(State::AwaitingUserConfirmation);
                out.push(prompts::tentative_classification(abuse_type));
                out.push(prompts::CONFIRM_CLASSIFICATION.to_string());
            }
            None => {
                self.advance(State::AwaitingAbuseType);
                out.push(prompts::abuse_menu());
            }
        }
        out
    }

    fn confirm_classification(&mut self, text: &str) -> Vec<String> {
        match text.trim() {
            "1" => {
                let Some(abuse_type) = self.abuse_type else {
                    return self.abandon("confirmation without a tentative abuse type");
                };
                self.hold_report(abuse_type.upper_label())
            }
            "2" => {
                self.abuse_type = None;
                self.advance(State::AwaitingAbuseType);
                vec![prompts::abuse_menu()]
            }
            _ => replies([prompts::INVALID_CONFIRMATION]),
        }
    }

    fn choose_abuse_type(&mut self, text: &str) -> Vec<String> {
        let Some(abuse_type) = AbuseType::from_choice(text) else {
            return vec![prompts::invalid_option::<AbuseType>()];
        };
        self.abuse_type = Some(abuse_type);

        if abuse_type == AbuseType::Misinformation {
            self.advance(State::AwaitingMisinfoCategory);
            return vec![prompts::misinfo_menu()];
        }
        self.hold_report(abuse_type.upper_label())
    }

    /// Stash the report and offer the context step.
    fn hold_report(&mut self, report_type: String) -> Vec<String> {
        let Some(message) = self.target.as_ref() else {
            return self.abandon("no target message while holding report");
        };
        self.pending_report = Some(PendingReport::for_message(report_type, message));
        self.advance(State::AwaitingContextConfirmation);
        replies([prompts::ASK_CONTEXT])
    }

    async fn choose_misinfo_category(&mut self, text: &str) -> Vec<String> {
        let Some(category) = MisinfoCategory::from_choice(text) else {
            return vec![prompts::invalid_option::<MisinfoCategory>()];
        };
        self.misinfo_category = Some(category);

        match category {
            MisinfoCategory::Health => {
                self.advance(State::AwaitingHealthCategory);
                vec![prompts::health_menu()]
            }
            MisinfoCategory::News => {
                self.advance(State::AwaitingNewsCategory);
                vec![prompts::news_menu()]
            }
            MisinfoCategory::Advertisement => {
                self.escalate_leaf(prompts::ADVERTISING_MISINFO.to_string(), prompts::SENT_TO_AD_TEAM)
                    .await
            }
        }
    }

    async fn choose_health_category(&mut self, text: &str) -> Vec<String> {
        let Some(category) = HealthCategory::from_choice(text) else {
            return vec![prompts::invalid_option::<HealthCategory>()];
        };
        self.specific_category = Some(SpecificCategory::Health(category));
        self.escalate_leaf(prompts::health_report_type(category), prompts::SENT_HEALTH)
            .await
    }

    async fn choose_news_category(&mut self, text: &str) -> Vec<String> {
        let Some(category) = NewsCategory::from_choice(text) else {
            return vec![prompts::invalid_option::<NewsCategory>()];
        };
        self.specific_category = Some(SpecificCategory::News(category));
        self.escalate_leaf(prompts::news_report_type(category), prompts::SENT_NEWS)
            .await
    }

    /// Misinformation leaves skip the context step: summarize to the
    /// moderator channel and escalate right away.
    async fn escalate_leaf(&mut self, report_type: String, reply: &str) -> Vec<String> {
        let Some(message) = self.target.clone() else {
            return self.abandon("no target message at misinformation leaf");
        };
        self.finish(ReportOutcome::Escalated);

        let summary = prompts::moderator_summary(&report_type, &message);
        if let Err(e) = self.collaborators.mod_channels.send(message.guild_id, &summary).await {
            tracing::warn!(
                error = %e,
                guild_id = message.guild_id,
                report_type = %report_type,
                "failed to post summary to moderator channel"
            );
        }

        self.escalate(PendingReport::for_message(report_type, &message), None, &message)
            .await;
        replies([reply])
    }

    async fn confirm_context(&mut self, text: &str) -> Vec<String> {
        match text.trim() {
            "1" => {
                self.advance(State::AwaitingContextText);
                replies([prompts::ENTER_CONTEXT])
            }
            "2" => self.finalize(None, prompts::SENT_WITHOUT_CONTEXT).await,
            _ => replies([prompts::INVALID_CONTEXT_CHOICE]),
        }
    }

    async fn receive_context(&mut self, text: &str) -> Vec<String> {
        let context = text.trim().to_string();
        self.user_context = Some(context.clone());
        self.finalize(Some(context), prompts::SENT_WITH_CONTEXT).await
    }

    /// Consume the stashed report and escalate it.
    async fn finalize(&mut self, context: Option<String>, reply: &str) -> Vec<String> {
        let (Some(pending), Some(message)) = (self.pending_report.take(), self.target.clone()) else {
            return self.abandon("context step reached without a pending report");
        };
        self.finish(ReportOutcome::Escalated);
        self.escalate(pending, context, &message).await;
        replies([reply])
    }

    async fn escalate(&self, report: PendingReport, context: Option<String>, message: &TargetMessage) {
        tracing::info!(
            reporter = %self.reporter_id,
            report_type = %report.report_type,
            guild_id = message.guild_id,
            has_context = context.is_some(),
            "escalating report"
        );
        counter!("reports_escalated_total", "report_type" => report.report_type.clone()).increment(1);

        let request = ModerationRequest {
            report_type: report.report_type,
            report_content: report.report_content,
            message_author: report.message_author,
            user_context: context,
            reporter_id: self.reporter_id.clone(),
            guild_id: message.guild_id,
            channel_id: message.channel_id,
            message_id: message.id,
        };

        if let Err(e) = self.collaborators.escalation.start_moderation_flow(request).await {
            counter!("report_escalation_failures_total").increment(1);
            tracing::error!(error = %e, reporter = %self.reporter_id, "failed to start moderation flow");
        }
    }

    /// Close a session whose fields no longer match its state.
    fn abandon(&mut self, reason: &str) -> Vec<String> {
        tracing::error!(reporter = %self.reporter_id, state = ?self.state, reason, "abandoning report");
        self.pending_report = None;
        self.finish(ReportOutcome::Cancelled);
        replies([prompts::LOST_TRACK])
    }

    fn finish(&mut self, outcome: ReportOutcome) {
        self.advance(State::ReportComplete);
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
            counter!("reports_finished_total", "outcome" => outcome.as_str()).increment(1);
        }
    }

    fn advance(&mut self, next: State) {
        tracing::debug!(reporter = %self.reporter_id, from = ?self.state, to = ?next, "report state advanced");
        self.state = next;
    }
}
