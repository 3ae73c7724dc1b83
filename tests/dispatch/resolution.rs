//! Integration tests for handler resolution
//!
//! The most specific satisfied entry wins; ties go to the earliest
//! registered plugin, then its earliest entry.

use parley_foundation::{ErrorCategory, ErrorKind, ModelId};
use parley_plugin::{DynPlugin, Event, PluginHost, PluginRegistry};
use proptest::prelude::*;

use crate::probe::Probe;

fn event(text: &str) -> Event {
    Event::parse_in(ModelId::fresh(), text).unwrap()
}

fn registry(plugins: Vec<Probe>) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    for plugin in plugins {
        registry.register(PluginHost::boxed(plugin)).unwrap();
    }
    registry
}

fn winner(registry: &PluginRegistry, event: &Event) -> (String, usize) {
    let resolution = registry.resolve(event).unwrap();
    let name = registry.get(resolution.plugin).unwrap().name().to_string();
    (name, resolution.entry)
}

// =============================================================================
// Specificity
// =============================================================================

#[test]
fn more_specific_entry_wins_across_plugins() {
    let registry = registry(vec![
        Probe::new("shell").on("show", &["subj", "obj"]),
        Probe::new("gallery").on("show", &["subj", "obj", "eventSet"]),
    ]);
    let show = event("show(subj=[e0], obj=[e1], eventSet=[e2])");

    let resolution = registry.resolve(&show).unwrap();
    assert_eq!(resolution.plugin, 1);
    assert_eq!(resolution.specificity, 3);

    let plain = event("show(subj=[e0], obj=[e1])");
    assert_eq!(winner(&registry, &plain).0, "shell");
}

#[test]
fn more_specific_entry_wins_within_a_plugin() {
    let registry = registry(vec![
        Probe::new("shell")
            .on("show", &["subj"])
            .on("show", &["subj", "obj"]),
    ]);
    assert_eq!(winner(&registry, &event("show(subj=[e0])")).1, 0);
    assert_eq!(winner(&registry, &event("show(subj=[e0], obj=[e1])")).1, 1);
}

#[test]
fn ties_go_to_the_first_registered() {
    let registry = registry(vec![
        Probe::new("first").on("go", &["subj", "dest"]),
        Probe::new("second").on("go", &["subj", "dest"]),
    ]);
    let go = event("go(subj=[e0], dest=[e1])");
    for _ in 0..3 {
        assert_eq!(winner(&registry, &go), ("first".to_string(), 0));
    }
}

// =============================================================================
// Subset Matching
// =============================================================================

#[test]
fn extra_keywords_do_not_block_a_match() {
    let registry = registry(vec![
        Probe::new("mover").on("move", &["subj", "obj", "manner"]),
        Probe::new("shell").on("move", &["subj", "obj"]),
    ]);
    let moved = event("move(subj=[e0], obj=[e1], dest=[e2])");
    assert_eq!(winner(&registry, &moved).0, "shell");
}

#[test]
fn missing_keywords_mean_no_handler() {
    let registry = registry(vec![Probe::new("shell").on("move", &["subj", "obj", "dest"])]);
    let err = registry.resolve(&event("move(subj=[e0], obj=[e1])")).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::DispatchFailure);
}

#[test]
fn predicate_must_match() {
    let registry = registry(vec![Probe::new("shell").on("go", &[])]);
    assert!(registry.resolve(&event("go()")).is_ok());
    assert!(registry.resolve(&event("run()")).is_err());
}

// =============================================================================
// Designated Plugins
// =============================================================================

#[test]
fn designated_plugin_is_the_only_candidate() {
    let registry = registry(vec![
        Probe::new("shell").on("show", &["subj", "obj"]),
        Probe::new("gallery").on("show", &["subj"]),
    ]);
    let show = event("show@gallery(subj=[e0], obj=[e1])");
    assert_eq!(winner(&registry, &show).0, "gallery");
}

#[test]
fn unknown_designated_plugin_cannot_dispatch() {
    let registry = registry(vec![Probe::new("shell").on("show", &["subj"])]);
    let err = registry.resolve(&event("show@nobody(subj=[e0])")).unwrap_err();
    match err.kind {
        ErrorKind::CannotDispatch { predicate, plugin } => {
            assert_eq!(predicate, "show");
            assert_eq!(plugin.as_deref(), Some("nobody"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_names_are_rejected() {
    let mut registry = registry(vec![Probe::new("shell")]);
    let err = registry
        .register(PluginHost::boxed(Probe::new("shell")))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicatePlugin(_)));
    assert_eq!(registry.len(), 1);
}

// =============================================================================
// Property Tests
// =============================================================================

const NAMES: [&str; 5] = ["alpha", "beta", "gamma", "delta", "epsilon"];

proptest! {
    #[test]
    fn non_competing_order_never_changes_the_winner(
        order in Just((0..NAMES.len()).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        // alpha is the only plugin with a three-keyword entry.
        let plugins = order
            .iter()
            .map(|&i| match i {
                0 => Probe::new(NAMES[0]).on("go", &["subj", "dest", "source"]),
                1 => Probe::new(NAMES[1]).on("go", &["subj", "dest"]),
                2 => Probe::new(NAMES[2]).on("go", &["subj"]),
                3 => Probe::new(NAMES[3]).on("show", &["subj", "dest", "source"]),
                _ => Probe::new(NAMES[4]).on("go", &["subj", "manner"]),
            })
            .collect();
        let registry = registry(plugins);
        let go = event("go(subj=[e0], dest=[e1], source=[e2])");
        prop_assert_eq!(winner(&registry, &go).0, "alpha");
    }

    #[test]
    fn competing_order_picks_the_first_registered(
        order in Just((0..NAMES.len()).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let plugins = order
            .iter()
            .map(|&i| Probe::new(NAMES[i]).on("go", &["subj", "dest"]))
            .collect();
        let registry = registry(plugins);
        let go = event("go(subj=[e0], dest=[e1])");

        let first = winner(&registry, &go);
        prop_assert_eq!(&first.0, NAMES[order[0]]);
        prop_assert_eq!(winner(&registry, &go), first);
    }
}
