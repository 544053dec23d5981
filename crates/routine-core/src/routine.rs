use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::product::{Product, Slot};

/// The user's routine: two independent, ordered, duplicate-free slot lists.
///
/// The same product may sit in both slots. Insertion order is display order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineState {
    #[serde(rename = "AM")]
    am: Vec<Product>,
    #[serde(rename = "PM")]
    pm: Vec<Product>,
}

impl RoutineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, slot: Slot) -> &[Product] {
        match slot {
            Slot::Am => &self.am,
            Slot::Pm => &self.pm,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Vec<Product> {
        match slot {
            Slot::Am => &mut self.am,
            Slot::Pm => &mut self.pm,
        }
    }

    pub fn contains(&self, slot: Slot, id: &str) -> bool {
        self.slot(slot).iter().any(|p| p.id == *id)
    }

    /// Append `product` to `slot` unless it is already there. Returns whether
    /// the list changed.
    pub fn insert(&mut self, slot: Slot, product: Product) -> bool {
        if self.contains(slot, product.id.as_str()) {
            return false;
        }
        self.slot_mut(slot).push(product);
        true
    }

    /// Remove the product with `id` from `slot`. Returns whether it was present.
    pub fn remove(&mut self, slot: Slot, id: &str) -> bool {
        let list = self.slot_mut(slot);
        let before = list.len();
        list.retain(|p| p.id != *id);
        list.len() != before
    }

    pub fn clear(&mut self) {
        self.am.clear();
        self.pm.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.am.is_empty() && self.pm.is_empty()
    }

    pub fn to_serializable(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a persisted routine. Both `AM` and `PM` must be present.
    ///
    /// Payloads written by older builds may carry duplicates; the first
    /// occurrence of each id per slot is kept.
    pub fn from_serializable(raw: &str) -> Result<Self, serde_json::Error> {
        let mut state: Self = serde_json::from_str(raw)?;
        for slot in Slot::ALL {
            let mut seen = HashSet::new();
            state.slot_mut(slot).retain(|p| seen.insert(p.id.clone()));
        }
        Ok(state)
    }
}
