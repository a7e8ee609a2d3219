use async_trait::async_trait;
use uuid::Uuid;

use modflow_shared::clients::rabbitmq::RabbitMQClient;
use modflow_shared::errors::{AppError, AppResult, ErrorCode};
use modflow_shared::types::event::{payloads, routing_keys, Event};

use crate::collaborators::{Escalation, ModerationRequest};

/// Hands finished reports to the moderation pipeline over RabbitMQ.
#[derive(Clone)]
pub struct AmqpEscalation {
    rabbitmq: RabbitMQClient,
}

impl AmqpEscalation {
    pub fn new(rabbitmq: RabbitMQClient) -> Self {
        Self { rabbitmq }
    }
}

pub fn report_escalated_event(request: ModerationRequest) -> Event<payloads::ReportEscalated> {
    let reporter_id = request.reporter_id;
    Event::new(
        "modflow-reporting",
        routing_keys::REPORTING_REPORT_ESCALATED,
        payloads::ReportEscalated {
            report_id: Uuid::now_v7(),
            report_type: request.report_type,
            report_content: request.report_content,
            message_author: request.message_author,
            user_context: request.user_context,
            guild_id: request.guild_id,
            channel_id: request.channel_id,
            message_id: request.message_id,
        },
    )
    .with_user(reporter_id)
}

#[async_trait]
impl Escalation for AmqpEscalation {
    async fn start_moderation_flow(&self, request: ModerationRequest) -> AppResult<()> {
        let event = report_escalated_event(request);

        self.rabbitmq
            .publish(routing_keys::REPORTING_REPORT_ESCALATED, &event)
            .await
            .map_err(|e| {
                AppError::new(ErrorCode::EscalationFailed, format!("failed to publish report.escalated event: {e}"))
            })?;

        tracing::info!(
            report_id = %event.data.report_id,
            report_type = %event.data.report_type,
            "report.escalated event published"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_carries_report_and_reporter() {
        let event = report_escalated_event(ModerationRequest {
            report_type: "BULLYING".into(),
            report_content: "you are awful".into(),
            message_author: "troll".into(),
            user_context: Some("they were rude".into()),
            reporter_id: "55".into(),
            guild_id: 1,
            channel_id: 2,
            message_id: 3,
        });

        assert_eq!(event.source, "modflow-reporting");
        assert_eq!(event.event_type, routing_keys::REPORTING_REPORT_ESCALATED);
        assert_eq!(event.user_id.as_deref(), Some("55"));
        assert_eq!(event.data.report_type, "BULLYING");
        assert_eq!(event.data.user_context.as_deref(), Some("they were rude"));
        assert_eq!((event.data.guild_id, event.data.channel_id, event.data.message_id), (1, 2, 3));
    }
}
