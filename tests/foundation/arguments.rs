//! Integration tests for keyword arguments
//!
//! Tests subset matching: a partial binding is satisfied by any superset
//! carrying positionally equal entity sequences.

use parley_foundation::{Arguments, EntityId, ModelId};
use proptest::prelude::*;

fn entities(model: ModelId, count: u64) -> Vec<EntityId> {
    (0..count).map(|i| EntityId::new(model, i)).collect()
}

// =============================================================================
// Subset Matching
// =============================================================================

#[test]
fn superset_satisfies_subset() {
    let m = ModelId::fresh();
    let [a, b, c] = [EntityId::new(m, 0), EntityId::new(m, 1), EntityId::new(m, 2)];
    let event = Arguments::new()
        .with("subj", [a])
        .with("obj", [b])
        .with("dest", [c]);

    assert!(event.satisfies(&Arguments::new().with("subj", [a]).with("obj", [b])));
    assert!(event.satisfies(&Arguments::new()));
    assert!(!event.satisfies(&Arguments::new().with("subj", [a]).with("manner", [b])));
}

#[test]
fn sequences_compare_positionally() {
    let m = ModelId::fresh();
    let [a, b] = [EntityId::new(m, 0), EntityId::new(m, 1)];
    let event = Arguments::new().with("obj", [a, b]);

    assert!(event.satisfies(&Arguments::new().with("obj", [a, b])));
    assert!(!event.satisfies(&Arguments::new().with("obj", [b, a])));
    assert!(!event.satisfies(&Arguments::new().with("obj", [a])));
}

#[test]
fn same_slot_in_another_model_differs() {
    let event = Arguments::new().with("subj", [EntityId::new(ModelId::fresh(), 0)]);
    let elsewhere = Arguments::new().with("subj", [EntityId::new(ModelId::fresh(), 0)]);
    assert!(!event.satisfies(&elsewhere));
}

#[test]
fn map_entities_rewrites_every_binding() {
    let from = ModelId::fresh();
    let to = ModelId::fresh();
    let args = Arguments::new()
        .with("subj", entities(from, 1))
        .with("obj", entities(from, 3));

    let moved = args.map_entities(|e| EntityId::new(to, e.index));
    assert!(moved.entities().all(|e| e.belongs_to(to)));
    assert_eq!(moved.get("obj").map(<[EntityId]>::len), Some(3));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn any_subset_of_keywords_is_satisfied(
        mask in proptest::collection::vec(any::<bool>(), 5),
    ) {
        let m = ModelId::fresh();
        let keywords = ["subj", "obj", "dest", "source", "topic"];
        let full: Arguments = keywords
            .iter()
            .enumerate()
            .map(|(i, k)| (*k, vec![EntityId::new(m, i as u64)]))
            .collect();
        let partial: Arguments = keywords
            .iter()
            .enumerate()
            .filter(|(i, _)| mask[*i])
            .map(|(i, k)| (*k, vec![EntityId::new(m, i as u64)]))
            .collect();

        prop_assert!(full.satisfies(&partial));
        let extra = partial.clone().with("manner", [EntityId::new(m, 9)]);
        prop_assert!(!full.satisfies(&extra));
    }
}
