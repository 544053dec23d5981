use std::path::Path;

use routine_core::{
    extract, ApplyReport, Catalog, ChatTransport, ConversationLog, FilterCriteria, Message,
    Product, RoutineState, SessionId, Slot, TransportError,
};
use routine_store::export::export_routine;
use routine_store::RoutineMirror;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::catalog_loader::CatalogStatus;
use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::routine_manager::RoutineManager;

pub const THINKING_PLACEHOLDER: &str = "…thinking";
pub const NETWORK_ERROR_NOTICE: &str = "Network error. Please try again.";

const EVENT_CAPACITY: usize = 64;

/// A user turn that has been recorded and is waiting for its reply.
#[derive(Debug)]
pub struct PendingTurn {
    turn: u64,
    messages: Vec<Message>,
}

impl PendingTurn {
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// The full conversation to send, system message first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

#[derive(Debug)]
pub enum TurnOutcome {
    Replied { content: String, report: ApplyReport },
    /// The user turn stays in the log; nothing else changed.
    Failed { notice: String, error: TransportError },
}

/// One chat session: the conversation, the catalog it was started with and
/// the routine being built.
///
/// At most one turn is in flight. A second message while a reply is pending
/// is rejected with [`SessionError::TurnInFlight`].
pub struct Session {
    id: SessionId,
    catalog: Catalog,
    catalog_status: CatalogStatus,
    routine: RoutineManager,
    log: ConversationLog,
    pending: Option<u64>,
    next_turn: u64,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(catalog: Catalog, catalog_status: CatalogStatus, mirror: RoutineMirror) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let routine = RoutineManager::restore(mirror, event_tx.clone());
        let id = SessionId::new();
        info!(session_id = %id, products = catalog.len(), "session started");
        Self {
            id,
            catalog,
            catalog_status,
            routine,
            log: ConversationLog::default(),
            pending: None,
            next_turn: 1,
            event_tx,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_status(&self) -> &CatalogStatus {
        &self.catalog_status
    }

    pub fn routine(&self) -> &RoutineState {
        self.routine.state()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Record a user message and hand back what to send.
    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.pending.is_some() {
            return Err(SessionError::TurnInFlight);
        }

        let turn = self.next_turn;
        self.next_turn += 1;
        self.pending = Some(turn);
        self.log.push_user(text);

        self.send_event(SessionEvent::UserMessage { content: text.to_string() });
        self.send_event(SessionEvent::AssistantPending {
            placeholder: THINKING_PLACEHOLDER.to_string(),
        });
        debug!(session_id = %self.id, turn, "turn started");

        Ok(PendingTurn { turn, messages: self.log.messages().to_vec() })
    }

    /// Settle a pending turn with the transport's result.
    pub fn complete_turn(
        &mut self,
        pending: PendingTurn,
        result: Result<String, TransportError>,
    ) -> Result<TurnOutcome, SessionError> {
        if self.pending != Some(pending.turn) {
            return Err(SessionError::StaleTurn);
        }
        self.pending = None;

        match result {
            Ok(content) => {
                self.log.push_assistant(content.as_str());
                let ids = extract(&content);
                let report = self.routine.apply_hints(&ids, &self.catalog);
                debug!(
                    session_id = %self.id,
                    turn = pending.turn,
                    hints = ids.len(),
                    added = report.added.len(),
                    "reply applied"
                );
                self.send_event(SessionEvent::AssistantReplied {
                    content: content.clone(),
                    report: report.clone(),
                });
                Ok(TurnOutcome::Replied { content, report })
            }
            Err(error) => {
                warn!(session_id = %self.id, turn = pending.turn, error = %error, "reply failed");
                self.send_event(SessionEvent::AssistantFailed {
                    notice: NETWORK_ERROR_NOTICE.to_string(),
                });
                Ok(TurnOutcome::Failed { notice: NETWORK_ERROR_NOTICE.to_string(), error })
            }
        }
    }

    /// Send one user message through `transport` and apply the reply.
    #[instrument(skip(self, transport, text), fields(session_id = %self.id, transport = transport.name()))]
    pub async fn submit(
        &mut self,
        transport: &dyn ChatTransport,
        text: &str,
    ) -> Result<TurnOutcome, SessionError> {
        let pending = self.begin_turn(text)?;
        let result = transport.complete(pending.messages()).await;
        self.complete_turn(pending, result)
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&Product> {
        self.catalog.filter(criteria)
    }

    pub fn add_by_id(&mut self, id: &str) -> Result<Vec<Slot>, SessionError> {
        self.routine.add_by_id(&self.catalog, id)
    }

    pub fn remove(&mut self, slot: Slot, id: &str) -> bool {
        self.routine.remove_product(slot, id)
    }

    pub fn clear_routine(&mut self) {
        self.routine.clear();
    }

    pub fn export(&self, path: &Path) -> Result<(), SessionError> {
        export_routine(self.routine.state(), path)?;
        Ok(())
    }

    fn send_event(&self, event: SessionEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("no event receivers, event dropped");
        }
    }
}
