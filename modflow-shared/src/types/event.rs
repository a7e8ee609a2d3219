use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ Event envelope wrapping all domain events.
///
/// Routing key format: `modflow.{domain}.{entity}.{action}`
/// Example: `modflow.reporting.report.escalated`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    /// Platform id of the user that triggered the event (snowflake string).
    pub user_id: Option<String>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Reporting events
    pub const REPORTING_REPORT_ESCALATED: &str = "modflow.reporting.report.escalated";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    /// A finished report handed to the moderation pipeline.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ReportEscalated {
        pub report_id: Uuid,
        pub report_type: String,
        pub report_content: String,
        pub message_author: String,
        pub user_context: Option<String>,
        pub guild_id: u64,
        pub channel_id: u64,
        pub message_id: u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_user_and_correlation() {
        let correlation = Uuid::new_v4();
        let event = Event::new("modflow-reporting", routing_keys::REPORTING_REPORT_ESCALATED, 7u8)
            .with_user("42")
            .with_correlation(correlation);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event_type"], "modflow.reporting.report.escalated");
        assert_eq!(value["user_id"], "42");
        assert_eq!(value["correlation_id"], correlation.to_string());
        assert_eq!(value["data"], 7);
    }
}
