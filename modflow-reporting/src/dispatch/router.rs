use std::collections::HashMap;

use metrics::gauge;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::collaborators::Collaborators;
use crate::session::prompts;

use super::actor::{spawn_session, Inbound, SessionClosed, SessionHandle};

const ROUTER_QUEUE_CAPACITY: usize = 1024;

enum RouterCommand {
    Message {
        reporter_id: String,
        text: String,
        reply: oneshot::Sender<Vec<String>>,
    },
    OpenSessions {
        reply: oneshot::Sender<usize>,
    },
}

/// Cloneable entry point into the session runtime.
#[derive(Clone)]
pub struct RouterHandle {
    commands: mpsc::Sender<RouterCommand>,
}

impl RouterHandle {
    /// Spawn the router task. Each session inbox buffers `inbox_capacity` messages.
    pub fn spawn(collaborators: Collaborators, inbox_capacity: usize) -> Self {
        let (commands, rx) = mpsc::channel(ROUTER_QUEUE_CAPACITY);
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();

        let router = SessionRouter {
            sessions: HashMap::new(),
            collaborators,
            inbox_capacity,
            closed_tx,
        };
        tokio::spawn(router.run(rx, closed_rx));

        Self { commands }
    }

    /// Deliver one message from `reporter_id` and wait for the replies.
    ///
    /// Returns no replies if the runtime has stopped.
    pub async fn handle_message(&self, reporter_id: &str, text: &str) -> Vec<String> {
        let (reply, rx) = oneshot::channel();
        let command = RouterCommand::Message {
            reporter_id: reporter_id.to_string(),
            text: text.to_string(),
            reply,
        };

        if self.commands.send(command).await.is_err() {
            tracing::error!(reporter = %reporter_id, "session router is not running");
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    pub async fn open_sessions(&self) -> Option<usize> {
        let (reply, rx) = oneshot::channel();
        self.commands.send(RouterCommand::OpenSessions { reply }).await.ok()?;
        rx.await.ok()
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// A handle whose router task is already gone.
    #[cfg(test)]
    pub(crate) fn stopped() -> Self {
        let (commands, _) = mpsc::channel(1);
        Self { commands }
    }
}

/// Owns the reporter -> session map. Only this task touches it.
struct SessionRouter {
    sessions: HashMap<String, SessionHandle>,
    collaborators: Collaborators,
    inbox_capacity: usize,
    closed_tx: mpsc::UnboundedSender<SessionClosed>,
}

impl SessionRouter {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<RouterCommand>,
        mut closed: mpsc::UnboundedReceiver<SessionClosed>,
    ) {
        tracing::info!("session router started");

        loop {
            tokio::select! {
                biased;

                Some(done) = closed.recv() => self.forget(done),
                command = commands.recv() => match command {
                    Some(RouterCommand::Message { reporter_id, text, reply }) => {
                        self.dispatch(reporter_id, Inbound { text, reply });
                    }
                    Some(RouterCommand::OpenSessions { reply }) => {
                        let _ = reply.send(self.sessions.len());
                    }
                    None => break,
                },
            }
        }

        tracing::info!(open_sessions = self.sessions.len(), "session router stopped");
    }

    fn dispatch(&mut self, reporter_id: String, inbound: Inbound) {
        let inbound = match self.sessions.get(&reporter_id) {
            Some(handle) => match handle.inbox.try_send(inbound) {
                Ok(()) => return,
                Err(TrySendError::Full(inbound)) => {
                    tracing::warn!(reporter = %reporter_id, "session inbox full");
                    let _ = inbound.reply.send(vec![prompts::BUSY.to_string()]);
                    return;
                }
                Err(TrySendError::Closed(inbound)) => {
                    self.remove(&reporter_id);
                    inbound
                }
            },
            None => inbound,
        };

        if !inbound.text.trim().eq_ignore_ascii_case(prompts::START_KEYWORD) {
            let _ = inbound.reply.send(vec![prompts::USAGE.to_string()]);
            return;
        }

        let handle = spawn_session(
            reporter_id.clone(),
            self.collaborators.clone(),
            self.inbox_capacity,
            self.closed_tx.clone(),
        );
        tracing::info!(reporter = %reporter_id, session_id = %handle.session_id, "report session opened");

        if let Err(e) = handle.inbox.try_send(inbound) {
            tracing::error!(reporter = %reporter_id, "fresh session rejected its first message");
            let inbound = match e {
                TrySendError::Full(inbound) | TrySendError::Closed(inbound) => inbound,
            };
            let _ = inbound.reply.send(Vec::new());
            return;
        }

        self.sessions.insert(reporter_id, handle);
        self.record_open_sessions();
    }

    fn remove(&mut self, reporter_id: &str) {
        if self.sessions.remove(reporter_id).is_some() {
            self.record_open_sessions();
        }
    }

    fn record_open_sessions(&self) {
        gauge!("report_sessions_open").set(self.sessions.len() as f64);
    }

    fn forget(&mut self, done: SessionClosed) {
        let matches = self
            .sessions
            .get(&done.reporter_id)
            .is_some_and(|h| h.session_id == done.session_id);
        if matches {
            self.remove(&done.reporter_id);
        }
        tracing::debug!(reporter = %done.reporter_id, session_id = %done.session_id, "report session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use uuid::Uuid;

    #[tokio::test]
    async fn closed_inbox_is_dropped_before_routing() {
        let harness = Harness::classified(None);
        let (closed_tx, _closed_rx) = mpsc::unbounded_channel();
        let mut router = SessionRouter {
            sessions: HashMap::new(),
            collaborators: harness.collaborators.clone(),
            inbox_capacity: 4,
            closed_tx,
        };
        let (inbox, _) = mpsc::channel(1);
        router
            .sessions
            .insert("alice".into(), SessionHandle { session_id: Uuid::new_v4(), inbox });

        let (reply, rx) = oneshot::channel();
        router.dispatch("alice".into(), Inbound { text: "hello".into(), reply });

        assert_eq!(rx.await.unwrap(), vec![prompts::USAGE.to_string()]);
        assert!(router.sessions.is_empty());
    }
}
