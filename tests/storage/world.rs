//! Integration tests for world model entities and values
//!
//! Tests entity allocation, string values, refresh tracking, and world
//! identity.

use parley_foundation::{EntityId, ErrorKind, ModelId};
use parley_storage::WorldModel;
use proptest::prelude::*;

// =============================================================================
// Entities
// =============================================================================

#[test]
fn new_world_has_user_and_computer() {
    let world = WorldModel::new();
    assert_eq!(world.entity_count(), 2);
    assert!(world.is_user(world.user()));
    assert!(world.is_computer(world.computer()));
    assert_ne!(world.user(), world.computer());
}

#[test]
fn entities_are_allocated_in_order() {
    let mut world = WorldModel::new();
    let a = world.new_entity();
    let b = world.new_entity();
    assert!(a.index < b.index);

    let all: Vec<EntityId> = world.entities().collect();
    assert_eq!(all.last(), Some(&b));
}

#[test]
fn foreign_entities_are_rejected() {
    let mut world = WorldModel::new();
    let other = WorldModel::new();
    let stranger = other.user();

    assert!(!world.contains(stranger));
    let err = world.set_string_value(stranger, "x").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ForeignEntity(_)));
}

#[test]
fn unknown_slots_are_rejected() {
    let world = WorldModel::new();
    let ghost = EntityId::new(world.id(), 99);
    let err = world.string_value(ghost).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownEntity(_)));
}

// =============================================================================
// Values and Refresh Tracking
// =============================================================================

#[test]
fn setting_the_same_value_twice_is_idempotent() {
    let mut world = WorldModel::new();
    let entity = world.new_entity();
    assert!(world.set_string_value(entity, "docs").unwrap());
    world.clear_refresh_pending();
    let revision = world.revision();

    assert!(!world.set_string_value(entity, "docs").unwrap());
    assert!(!world.refresh_pending());
    assert_eq!(world.revision(), revision);
}

#[test]
fn changing_a_value_marks_refresh() {
    let mut world = WorldModel::new();
    let entity = world.new_entity();
    world.set_string_value(entity, "docs").unwrap();
    world.clear_refresh_pending();

    world.set_string_value(entity, "notes").unwrap();
    assert!(world.refresh_pending());
    assert_eq!(world.string_value(entity).unwrap(), Some("notes"));
}

#[test]
fn values_find_the_earliest_entity_first() {
    let mut world = WorldModel::new();
    let first = world.new_entity();
    let second = world.new_entity();
    world.set_string_value(second, "twin").unwrap();
    world.set_string_value(first, "twin").unwrap();

    let found: Vec<EntityId> = world.entities_with_value("twin").collect();
    assert_eq!(found, [first, second]);
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn worlds_have_distinct_ids() {
    let a = WorldModel::new();
    let b = WorldModel::new();
    assert_ne!(a.id(), b.id());
}

#[test]
fn clones_share_identity() {
    let mut world = WorldModel::new();
    let entity = world.new_entity();
    let copy = world.clone();
    assert_eq!(copy.id(), world.id());
    assert!(copy.contains(entity));
}

#[test]
fn restamped_world_is_disjoint() {
    let mut world = WorldModel::new();
    let entity = world.new_entity();
    world.set_string_value(entity, "docs").unwrap();

    let copy = world.restamped();
    assert_ne!(copy.id(), world.id());
    assert!(!copy.contains(entity));
    let moved = EntityId::new(copy.id(), entity.index);
    assert_eq!(copy.string_value(moved).unwrap(), Some("docs"));
    assert!(copy.refresh_pending());
}

#[test]
fn representation_lists_values() {
    let mut world = WorldModel::new();
    let entity = world.new_entity();
    world.set_string_value(entity, "docs").unwrap();
    let text = world.representation();
    assert!(text.contains("\"docs\""));
    assert!(text.contains(&format!("m{}", world.id().raw())));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn rewriting_values_never_refreshes(values in proptest::collection::vec("[a-z]{1,8}", 1..10)) {
        let mut world = WorldModel::new();
        let entities: Vec<EntityId> = values.iter().map(|_| world.new_entity()).collect();
        for (entity, value) in entities.iter().zip(&values) {
            world.set_string_value(*entity, value.as_str()).unwrap();
        }
        world.clear_refresh_pending();
        let revision = world.revision();

        for (entity, value) in entities.iter().zip(&values) {
            prop_assert!(!world.set_string_value(*entity, value.as_str()).unwrap());
        }
        prop_assert!(!world.refresh_pending());
        prop_assert_eq!(world.revision(), revision);
    }

    #[test]
    fn fresh_models_never_repeat(count in 2usize..20) {
        let mut ids: Vec<ModelId> = (0..count).map(|_| ModelId::fresh()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), count);
    }
}
