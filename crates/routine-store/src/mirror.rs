use routine_core::RoutineState;
use tracing::{debug, warn};

use crate::database::Database;
use crate::error::StoreError;
use crate::kv::KvRepo;

pub const ROUTINE_KEY: &str = "routine";

/// Best-effort durable copy of the routine. No versioning, no migration:
/// anything unreadable is treated as absent.
#[derive(Clone)]
pub struct RoutineMirror {
    kv: KvRepo,
}

impl RoutineMirror {
    pub fn new(db: Database) -> Self {
        Self { kv: KvRepo::new(db) }
    }

    /// Overwrite the stored routine with `state`.
    pub fn save(&self, state: &RoutineState) -> Result<(), StoreError> {
        let raw = state.to_serializable()?;
        self.kv.put(ROUTINE_KEY, &raw)
    }

    /// Restore the stored routine. `None` when nothing usable is stored.
    pub fn load(&self) -> Option<RoutineState> {
        let raw = match self.kv.get(ROUTINE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "could not read stored routine");
                return None;
            }
        };
        match RoutineState::from_serializable(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                debug!(error = %e, "discarding malformed stored routine");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routine_core::{Product, ProductId, Slot};

    fn product(id: &str, steps: &[Slot]) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            brand: "Garnier".into(),
            category: "skincare".into(),
            concerns: vec!["dryness".into()],
            key_ingredients: vec!["Glycerin".into()],
            steps: steps.iter().copied().collect(),
            notes: Some("note".into()),
        }
    }

    fn mirror() -> (RoutineMirror, KvRepo) {
        let db = Database::in_memory().unwrap();
        (RoutineMirror::new(db.clone()), KvRepo::new(db))
    }

    #[test]
    fn load_without_saved_state_is_none() {
        assert!(mirror().0.load().is_none());
    }

    #[test]
    fn round_trip_empty() {
        let (m, _) = mirror();
        m.save(&RoutineState::new()).unwrap();
        assert_eq!(m.load(), Some(RoutineState::new()));
    }

    #[test]
    fn round_trip_one_and_many() {
        let (m, _) = mirror();
        let mut state = RoutineState::new();
        state.insert(Slot::Am, product("one", &[Slot::Am]));
        m.save(&state).unwrap();
        assert_eq!(m.load().as_ref(), Some(&state));

        let both = product("both", &[Slot::Am, Slot::Pm]);
        state.insert(Slot::Am, both.clone());
        state.insert(Slot::Pm, both);
        state.insert(Slot::Pm, product("night", &[Slot::Pm]));
        m.save(&state).unwrap();
        assert_eq!(m.load(), Some(state));
    }

    #[test]
    fn save_overwrites_previous() {
        let (m, _) = mirror();
        let mut state = RoutineState::new();
        state.insert(Slot::Am, product("one", &[Slot::Am]));
        m.save(&state).unwrap();
        m.save(&RoutineState::new()).unwrap();
        assert_eq!(m.load(), Some(RoutineState::new()));
    }

    #[test]
    fn missing_slot_loads_as_none() {
        let (m, kv) = mirror();
        kv.put(ROUTINE_KEY, r#"{"AM": []}"#).unwrap();
        assert!(m.load().is_none());
    }

    #[test]
    fn garbage_loads_as_none() {
        let (m, kv) = mirror();
        kv.put(ROUTINE_KEY, "{not json").unwrap();
        assert!(m.load().is_none());
        kv.put(ROUTINE_KEY, "[]").unwrap();
        assert!(m.load().is_none());
    }
}
