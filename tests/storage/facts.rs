//! Integration tests for world model facts
//!
//! Tests assertion, partial-argument queries, negated facts, and retraction.

use parley_foundation::{Arguments, EntityId, ErrorKind};
use parley_storage::{Fact, WorldModel};

fn containment(world: &mut WorldModel) -> (EntityId, EntityId) {
    let container = world.new_entity();
    let content = world.new_entity();
    let args = Arguments::new()
        .with("container", [container])
        .with("content", [content]);
    world.assert_fact(Fact::new("contains", args)).unwrap();
    (container, content)
}

// =============================================================================
// Assertion and Queries
// =============================================================================

#[test]
fn asserted_fact_is_found_by_partial_arguments() {
    let mut world = WorldModel::new();
    let (container, content) = containment(&mut world);

    let by_container = Arguments::new().with("container", [container]);
    let by_content = Arguments::new().with("content", [content]);
    assert!(world.holds("contains", &by_container));
    assert!(world.holds("contains", &by_content));
    assert!(world.holds("contains", &Arguments::new()));
    assert!(!world.holds("contains", &Arguments::new().with("content", [container])));
    assert!(!world.holds("likes", &Arguments::new()));
}

#[test]
fn entities_with_collects_bound_keyword() {
    let mut world = WorldModel::new();
    let (container, _) = containment(&mut world);
    let (other, _) = containment(&mut world);

    let containers: Vec<_> = world.entities_with("contains", "container").collect();
    assert_eq!(containers, [container, other]);
}

#[test]
fn negated_facts_do_not_hold() {
    let mut world = WorldModel::new();
    let entity = world.new_entity();
    let subject = Arguments::new().with("subj", [entity]);
    world
        .assert_fact(Fact::new("directory", subject.clone()).negated())
        .unwrap();

    assert_eq!(world.fact_count(), 1);
    assert!(!world.holds("directory", &subject));
}

#[test]
fn facts_remember_their_author() {
    let mut world = WorldModel::new();
    let entity = world.new_entity();
    let fact = Fact::new("directory", Arguments::new().with("subj", [entity])).asserted_by("shell");
    world.assert_fact(fact).unwrap();

    let stored = world.facts().next().unwrap();
    assert_eq!(stored.asserted_by.as_deref(), Some("shell"));
    assert!(stored.mentions(entity));
}

#[test]
fn foreign_participants_are_rejected() {
    let mut world = WorldModel::new();
    let stranger = WorldModel::new().user();
    let err = world
        .assert_fact(Fact::new("directory", Arguments::new().with("subj", [stranger])))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ForeignEntity(_)));
    assert_eq!(world.fact_count(), 0);
}

// =============================================================================
// Retraction
// =============================================================================

#[test]
fn retract_removes_only_matching_facts() {
    let mut world = WorldModel::new();
    let (container, content) = containment(&mut world);
    let (_, kept) = containment(&mut world);
    world.clear_refresh_pending();

    let removed = world.retract("contains", &Arguments::new().with("container", [container]));
    assert_eq!(removed, 1);
    assert!(world.refresh_pending());
    assert!(!world.holds("contains", &Arguments::new().with("content", [content])));
    assert!(world.holds("contains", &Arguments::new().with("content", [kept])));
}

#[test]
fn retracting_nothing_changes_nothing() {
    let mut world = WorldModel::new();
    containment(&mut world);
    world.clear_refresh_pending();
    let revision = world.revision();

    assert_eq!(world.retract("likes", &Arguments::new()), 0);
    assert_eq!(world.revision(), revision);
    assert!(!world.refresh_pending());
}
