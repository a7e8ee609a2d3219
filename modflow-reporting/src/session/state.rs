use crate::collaborators::TargetMessage;

/// Position of a report conversation.
///
/// `ReportStart` is the only initial state and `ReportComplete` the only
/// terminal one, reached both by escalation and by cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    ReportStart,
    AwaitingMessage,
    /// Target resolved, classification not yet applied.
    MessageIdentified,
    AwaitingAbuseType,
    AwaitingMisinfoCategory,
    AwaitingHealthCategory,
    AwaitingNewsCategory,
    ReportComplete,
    AwaitingUserConfirmation,
    AwaitingContextConfirmation,
    AwaitingContextText,
}

impl State {
    pub fn is_terminal(self) -> bool {
        self == State::ReportComplete
    }
}

/// How a session reached `ReportComplete`. Recorded once, for logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Escalated,
    Cancelled,
}

impl ReportOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Escalated => "escalated",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Report held back while the reporter decides whether to add context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReport {
    pub report_type: String,
    pub report_content: String,
    pub message_author: String,
}

impl PendingReport {
    pub fn for_message(report_type: impl Into<String>, message: &TargetMessage) -> Self {
        Self {
            report_type: report_type.into(),
            report_content: message.content.clone(),
            message_author: message.author_name.clone(),
        }
    }
}
