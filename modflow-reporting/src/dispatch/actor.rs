use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::collaborators::Collaborators;
use crate::session::ReportSession;

/// One inbound message for a session, answered through `reply`.
pub(crate) struct Inbound {
    pub text: String,
    pub reply: oneshot::Sender<Vec<String>>,
}

/// Sent to the router once a session reaches its terminal state.
#[derive(Debug)]
pub(crate) struct SessionClosed {
    pub reporter_id: String,
    pub session_id: Uuid,
}

pub(crate) struct SessionHandle {
    pub session_id: Uuid,
    pub inbox: mpsc::Sender<Inbound>,
}

/// Start a task that owns a fresh session and processes its inbox in order.
pub(crate) fn spawn_session(
    reporter_id: String,
    collaborators: Collaborators,
    inbox_capacity: usize,
    closed: mpsc::UnboundedSender<SessionClosed>,
) -> SessionHandle {
    let session_id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(inbox_capacity.max(1));
    let session = ReportSession::new(reporter_id, collaborators);

    tokio::spawn(run_session(session_id, session, rx, closed));

    SessionHandle { session_id, inbox: tx }
}

async fn run_session(
    session_id: Uuid,
    mut session: ReportSession,
    mut inbox: mpsc::Receiver<Inbound>,
    closed: mpsc::UnboundedSender<SessionClosed>,
) {
    tracing::debug!(session_id = %session_id, reporter = %session.reporter_id(), "session actor started");

    while let Some(Inbound { text, reply }) = inbox.recv().await {
        let replies = session.handle_message(&text).await;
        if session.report_complete() {
            // Close before answering so a follow-up sent after this reply
            // is routed to a new session instead of this dead one.
            inbox.close();
            let _ = reply.send(replies);
            break;
        }
        let _ = reply.send(replies);
    }

    let _ = closed.send(SessionClosed {
        reporter_id: session.reporter_id().to_string(),
        session_id,
    });

    // Messages queued before the close still get an answer from the terminal session.
    while let Some(Inbound { text, reply }) = inbox.recv().await {
        let _ = reply.send(session.handle_message(&text).await);
    }

    tracing::info!(
        session_id = %session_id,
        reporter = %session.reporter_id(),
        outcome = session.outcome().map(|o| o.as_str()).unwrap_or("abandoned"),
        "session actor finished"
    );
}
