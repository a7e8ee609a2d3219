use crate::collaborators::TargetMessage;
use crate::taxonomy::{AbuseType, HealthCategory, MenuOption, MisinfoCategory, NewsCategory};

pub const CANCEL_KEYWORD: &str = "cancel";
pub const HELP_KEYWORD: &str = "help";
pub const START_KEYWORD: &str = "report";

pub const CANCELLED: &str = "Report cancelled.";

pub const ONBOARDING: &str = "Thank you for starting the reporting process. \
Say `help` at any time for more information.\n\n\
Please copy paste the link to the message you want to report.\n\
You can obtain this link by right-clicking the message and clicking `Copy Message Link`.";

pub const LINK_UNREADABLE: &str =
    "I'm sorry, I couldn't read that link. Please try again or say `cancel` to cancel.";
pub const GUILD_NOT_FOUND: &str = "I cannot accept reports of messages from guilds that I'm not in. \
Please have the guild owner add me to the guild and try again.";
pub const CHANNEL_NOT_FOUND: &str =
    "It seems this channel was deleted or never existed. Please try again or say `cancel` to cancel.";
pub const MESSAGE_NOT_FOUND: &str =
    "It seems this message was deleted or never existed. Please try again or say `cancel` to cancel.";

pub const FOUND_MESSAGE: &str = "I found this message:";
pub const CONFIRM_CLASSIFICATION: &str = "Do you agree with this classification?\n1. Yes\n2. No";
pub const INVALID_CONFIRMATION: &str = "Invalid response. Please reply with 1 for Yes or 2 for No.";

pub const ASK_CONTEXT: &str =
    "Do you want to add additional context for why you are reporting this message?\n1. Yes\n2. No";
pub const ENTER_CONTEXT: &str = "Please enter additional context (why you are reporting):";
pub const INVALID_CONTEXT_CHOICE: &str = "Invalid choice. Reply with 1 (Yes) or 2 (No).";

pub const SENT_WITHOUT_CONTEXT: &str = "Thank you. Your report has been sent to the moderation team.";
pub const SENT_WITH_CONTEXT: &str =
    "Thank you. Your report and context have been sent to the moderation team.";
pub const SENT_TO_AD_TEAM: &str = "This has been reported to our ad team.";
pub const SENT_HEALTH: &str = "This has been sent to our moderation team.";
pub const SENT_NEWS: &str = "This has been sent to our team.";

pub const ALREADY_CLOSED: &str = "This report is already closed. Say `report` to start a new one.";
pub const LOST_TRACK: &str =
    "Something went wrong with this report and it has been closed. Say `report` to start again.";

pub const BUSY: &str =
    "I'm still working on your previous messages. Please wait a moment and try again.";

pub const USAGE: &str = "Use the `report` command to begin the reporting process.\n\
Use the `cancel` command to cancel the report process.";

pub const ADVERTISING_MISINFO: &str = "ADVERTISING MISINFO";

pub fn quote(message: &TargetMessage) -> String {
    format!("```{}: {}```", message.author_name, message.content)
}

pub fn tentative_classification(abuse_type: AbuseType) -> String {
    format!("The system classified this message as {abuse_type}.")
}

pub fn abuse_menu() -> String {
    format!("What type of abuse would you like to report?\n{}", AbuseType::menu_lines())
}

pub fn misinfo_menu() -> String {
    format!("Please select the misinformation category:\n{}", MisinfoCategory::menu_lines())
}

pub fn health_menu() -> String {
    format!(
        "Please specify the health misinformation category:\n{}",
        HealthCategory::menu_lines()
    )
}

pub fn news_menu() -> String {
    format!("Please specify the news category:\n{}", NewsCategory::menu_lines())
}

/// Range error for a menu of `T`.
pub fn invalid_option<T: MenuOption>() -> String {
    format!("Please select a valid option (1-{}) from the list above.", T::OPTIONS.len())
}

pub fn health_report_type(category: HealthCategory) -> String {
    format!("HEALTH MISINFO - {category}")
}

pub fn news_report_type(category: NewsCategory) -> String {
    format!("NEWS MISINFO - {category}")
}

/// Summary posted into a guild's moderator channel.
pub fn moderator_summary(report_type: &str, message: &TargetMessage) -> String {
    format!("{report_type}:\n{}: {}", message.author_name, message.content)
}
