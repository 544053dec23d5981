use routine_core::applier::add_product;
use routine_core::{apply, ApplyReport, Catalog, Product, RoutineState, Slot};
use routine_store::RoutineMirror;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::events::SessionEvent;

/// Owns the live routine and keeps the durable mirror in step with it.
///
/// Every mutation that changes the state is saved and announced with
/// [`SessionEvent::RoutineChanged`]. A failed save is logged and otherwise
/// ignored: the in-memory routine stays authoritative for the session.
pub struct RoutineManager {
    state: RoutineState,
    mirror: RoutineMirror,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl RoutineManager {
    /// Start from whatever the mirror holds, or an empty routine.
    pub fn restore(mirror: RoutineMirror, event_tx: broadcast::Sender<SessionEvent>) -> Self {
        let state = mirror.load().unwrap_or_default();
        info!(
            am = state.slot(Slot::Am).len(),
            pm = state.slot(Slot::Pm).len(),
            "routine restored"
        );
        Self { state, mirror, event_tx }
    }

    pub fn state(&self) -> &RoutineState {
        &self.state
    }

    /// Add a product to every slot its steps name. Returns the slots that changed.
    pub fn add_product(&mut self, product: &Product) -> Vec<Slot> {
        let changed = add_product(&mut self.state, product);
        if !changed.is_empty() {
            self.commit();
        }
        changed
    }

    /// Manual add: resolve `id` against the catalog first.
    pub fn add_by_id(&mut self, catalog: &Catalog, id: &str) -> Result<Vec<Slot>, SessionError> {
        let product = catalog
            .get(id.trim())
            .ok_or_else(|| SessionError::UnknownProduct(id.trim().to_string()))?;
        Ok(self.add_product(product))
    }

    pub fn remove_product(&mut self, slot: Slot, id: &str) -> bool {
        let removed = self.state.remove(slot, id);
        if removed {
            self.commit();
        }
        removed
    }

    /// Apply ids extracted from an assistant reply.
    pub fn apply_hints<S: AsRef<str>>(&mut self, ids: &[S], catalog: &Catalog) -> ApplyReport {
        let report = apply(ids.iter().map(AsRef::as_ref), catalog, &mut self.state);
        if report.changed() {
            self.commit();
        }
        report
    }

    pub fn clear(&mut self) {
        if self.state.is_empty() {
            return;
        }
        self.state.clear();
        self.commit();
    }

    fn commit(&self) {
        if let Err(e) = self.mirror.save(&self.state) {
            warn!(error = %e, "could not persist routine");
        }
        if self
            .event_tx
            .send(SessionEvent::RoutineChanged { routine: self.state.clone() })
            .is_err()
        {
            debug!("no event receivers, routine change not announced");
        }
    }
}
