use tracing::debug;

use crate::catalog::Catalog;
use crate::ids::ProductId;
use crate::product::{Product, Slot};
use crate::routine::RoutineState;

/// What a call to [`apply`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Slot placements that were new, in application order.
    pub added: Vec<(Slot, ProductId)>,
    /// Ids that did not resolve against the catalog.
    pub unknown: Vec<String>,
}

impl ApplyReport {
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Place `product` in every slot named by its `steps`, skipping slots that
/// already hold it. Returns the slots that changed.
pub fn add_product(state: &mut RoutineState, product: &Product) -> Vec<Slot> {
    product
        .steps
        .iter()
        .copied()
        .filter(|&slot| state.insert(slot, product.clone()))
        .collect()
}

/// Resolve each id against `catalog` and add the product to the routine.
///
/// Unknown ids are skipped: assistant text may mention retired or invented
/// products. Applying the same ids twice leaves the state as one application
/// did.
pub fn apply<I, S>(ids: I, catalog: &Catalog, state: &mut RoutineState) -> ApplyReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ApplyReport::default();
    for id in ids {
        let id = id.as_ref();
        let Some(product) = catalog.get(id) else {
            debug!(product_id = %id, "hint references unknown product");
            report.unknown.push(id.to_string());
            continue;
        };
        for slot in add_product(state, product) {
            report.added.push((slot, product.id.clone()));
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::fixtures::product;
    use proptest::prelude::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product("am-only", "skincare", &[], &[Slot::Am]),
            product("pm-only", "skincare", &[], &[Slot::Pm]),
            product("both", "skincare", &[], &[Slot::Am, Slot::Pm]),
            product("never", "skincare", &[], &[]),
        ])
    }

    fn ids(state: &RoutineState, slot: Slot) -> Vec<&str> {
        state.slot(slot).iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn places_product_by_steps() {
        let mut state = RoutineState::new();
        let report = apply(["am-only", "both", "pm-only"], &catalog(), &mut state);
        assert_eq!(ids(&state, Slot::Am), vec!["am-only", "both"]);
        assert_eq!(ids(&state, Slot::Pm), vec!["both", "pm-only"]);
        assert_eq!(report.added.len(), 4);
        assert!(report.unknown.is_empty());
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let mut state = RoutineState::new();
        let report = apply(["ghost", "am-only"], &catalog(), &mut state);
        assert_eq!(ids(&state, Slot::Am), vec!["am-only"]);
        assert_eq!(report.unknown, vec!["ghost"]);
    }

    #[test]
    fn product_without_steps_changes_nothing() {
        let mut state = RoutineState::new();
        let report = apply(["never"], &catalog(), &mut state);
        assert!(state.is_empty());
        assert!(!report.changed());
    }

    #[test]
    fn second_application_is_a_no_op() {
        let cat = catalog();
        let mut state = RoutineState::new();
        apply(["both", "am-only"], &cat, &mut state);
        let once = state.clone();
        let report = apply(["both", "am-only"], &cat, &mut state);
        assert_eq!(state, once);
        assert!(!report.changed());
    }

    #[test]
    fn existing_entries_keep_their_position() {
        let cat = catalog();
        let mut state = RoutineState::new();
        apply(["both", "am-only"], &cat, &mut state);
        apply(["am-only", "both"], &cat, &mut state);
        assert_eq!(ids(&state, Slot::Am), vec!["both", "am-only"]);
    }

    #[test]
    fn ids_match_exactly() {
        let mut state = RoutineState::new();
        apply(["AM-ONLY", " am-only"], &catalog(), &mut state);
        assert!(state.is_empty());
    }

    fn id_strategy() -> impl Strategy<Value = Vec<String>> {
        let pool = prop_oneof![
            Just("am-only".to_string()),
            Just("pm-only".to_string()),
            Just("both".to_string()),
            Just("never".to_string()),
            "[a-z-]{1,8}",
        ];
        proptest::collection::vec(pool, 0..24)
    }

    proptest! {
        #[test]
        fn apply_is_idempotent(seq in id_strategy()) {
            let cat = catalog();
            let mut state = RoutineState::new();
            apply(&seq, &cat, &mut state);
            let once = state.clone();
            apply(&seq, &cat, &mut state);
            prop_assert_eq!(state, once);
        }

        #[test]
        fn slots_never_hold_duplicates(seq in id_strategy(), rounds in 1usize..4) {
            let cat = catalog();
            let mut state = RoutineState::new();
            for _ in 0..rounds {
                apply(&seq, &cat, &mut state);
            }
            for slot in Slot::ALL {
                let mut seen = std::collections::HashSet::new();
                for p in state.slot(slot) {
                    prop_assert!(seen.insert(p.id.clone()), "duplicate {} in {}", p.id, slot);
                }
            }
        }
    }
}
