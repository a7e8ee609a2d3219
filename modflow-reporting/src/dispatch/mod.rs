//! Session runtime: a router task owning the reporter -> session map and
//! one actor task per open report, each draining its own inbox in order.

mod actor;
mod router;

pub use router::RouterHandle;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::prompts;
    use crate::testing::{FakeClassifier, FakePlatform, Harness};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn messages_without_session_get_usage_hint() {
        let harness = Harness::classified(None);
        let router = RouterHandle::spawn(harness.collaborators.clone(), 8);

        for text in ["hello", "help", "cancel", "/1/2/3"] {
            let replies = router.handle_message("alice", text).await;
            assert_eq!(replies, vec![prompts::USAGE.to_string()]);
        }
        assert_eq!(router.open_sessions().await, Some(0));
    }

    #[tokio::test]
    async fn report_keyword_opens_a_session() {
        let harness = Harness::classified(None);
        let router = RouterHandle::spawn(harness.collaborators.clone(), 8);

        let replies = router.handle_message("alice", " Report ").await;

        assert_eq!(replies, vec![prompts::ONBOARDING.to_string()]);
        assert_eq!(router.open_sessions().await, Some(1));
    }

    #[tokio::test]
    async fn full_report_through_router_closes_session() {
        let harness = Harness::classified(None);
        let router = RouterHandle::spawn(harness.collaborators.clone(), 8);

        router.handle_message("alice", "report").await;
        let replies = router.handle_message("alice", "check /1/2/3 please").await;
        assert_eq!(replies.last().unwrap(), &prompts::abuse_menu());
        router.handle_message("alice", "1").await;
        let replies = router.handle_message("alice", "2").await;
        assert_eq!(replies, vec![prompts::SENT_WITHOUT_CONTEXT.to_string()]);

        // The finished session no longer receives messages.
        let replies = router.handle_message("alice", "2").await;
        assert_eq!(replies, vec![prompts::USAGE.to_string()]);
        assert_eq!(harness.escalations().len(), 1);
        assert_eq!(harness.escalations()[0].reporter_id, "alice");
    }

    #[tokio::test]
    async fn cancel_ends_session_and_report_starts_fresh() {
        let harness = Harness::classified(None);
        let router = RouterHandle::spawn(harness.collaborators.clone(), 8);

        router.handle_message("alice", "report").await;
        router.handle_message("alice", "/1/2/3").await;
        let replies = router.handle_message("alice", "cancel").await;
        assert_eq!(replies, vec![prompts::CANCELLED.to_string()]);

        let replies = router.handle_message("alice", "report").await;
        assert_eq!(replies, vec![prompts::ONBOARDING.to_string()]);
        assert!(harness.escalations().is_empty());
    }

    #[tokio::test]
    async fn reporters_progress_independently() {
        let harness = Harness::classified(None);
        let router = RouterHandle::spawn(harness.collaborators.clone(), 8);

        router.handle_message("alice", "report").await;
        router.handle_message("bob", "report").await;
        router.handle_message("alice", "/1/2/3").await;

        // bob is still waiting for a link
        let replies = router.handle_message("bob", "5").await;
        assert_eq!(replies, vec![prompts::LINK_UNREADABLE.to_string()]);

        let replies = router.handle_message("alice", "5").await;
        assert_eq!(replies, vec![prompts::ASK_CONTEXT.to_string()]);
        assert_eq!(router.open_sessions().await, Some(2));
    }

    #[tokio::test]
    async fn full_inbox_answers_busy() {
        let hold = Arc::new(Notify::new());
        let harness = Harness::new(
            FakePlatform::with_message("you are awful"),
            FakeClassifier { hold: Some(hold.clone()), ..FakeClassifier::returning(Some("bullying")) },
        );
        let router = RouterHandle::spawn(harness.collaborators.clone(), 1);
        router.handle_message("alice", "report").await;

        // The actor blocks in classification while holding the link.
        let link = tokio::spawn({
            let router = router.clone();
            async move { router.handle_message("alice", "/1/2/3").await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        // Fills the single inbox slot.
        let queued = tokio::spawn({
            let router = router.clone();
            async move { router.handle_message("alice", "1").await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let replies = router.handle_message("alice", "2").await;
        assert_eq!(replies, vec![prompts::BUSY.to_string()]);

        hold.notify_one();
        let replies = link.await.unwrap();
        assert_eq!(replies[2], "The system classified this message as BULLYING.");
        assert_eq!(queued.await.unwrap(), vec![prompts::ASK_CONTEXT.to_string()]);
        assert_eq!(router.open_sessions().await, Some(1));
    }

    #[tokio::test]
    async fn concurrent_reporters_each_escalate_once() {
        let harness = Harness::classified(None);
        let router = RouterHandle::spawn(harness.collaborators.clone(), 8);

        let mut tasks = Vec::new();
        for i in 0..10 {
            let router = router.clone();
            tasks.push(tokio::spawn(async move {
                let reporter = format!("user-{i}");
                for text in ["report", "/1/2/3", "1", "1", "spam everywhere"] {
                    router.handle_message(&reporter, text).await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let escalations = harness.escalations();
        assert_eq!(escalations.len(), 10);
        assert!(escalations.iter().all(|e| e.user_context.as_deref() == Some("spam everywhere")));
        assert!(router.is_running());
    }
}
