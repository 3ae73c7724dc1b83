//! Integration tests for handler invocation
//!
//! Tests running resolved entries through the plugin host and the world
//! context handed to handlers.

use parley_engine::Grammar;
use parley_foundation::{Arguments, ErrorKind};
use parley_plugin::{
    DynPlugin, Event, EventSet, PluginHost, PluginRegistry, WorldChange, WorldContext,
};
use parley_storage::WorldModel;

use crate::probe::Probe;

fn compiled(plugins: &[&dyn DynPlugin]) -> Grammar {
    let declarations: Vec<_> = plugins
        .iter()
        .map(|p| (p.name(), p.declarations()))
        .collect();
    Grammar::compile(&declarations).unwrap()
}

#[test]
fn resolved_entry_runs_once_with_its_keywords() {
    let mut host = PluginHost::new(
        Probe::new("shell")
            .on("go", &["subj"])
            .on("go", &["subj", "dest"]),
    );
    let grammar = compiled(&[&host]);
    let mut world = WorldModel::new();
    let dest = world.new_entity();
    let go = Event::new("go")
        .with_argument("subj", [world.computer()])
        .with_argument("dest", [dest]);
    let set = EventSet::from(vec![go.clone()]);

    let candidate = host.best_match(&go).unwrap();
    let mut ctx = WorldContext::new(&mut world, &grammar.signature, "shell");
    host.invoke(candidate.entry, &go, &set, &mut ctx).unwrap();
    let (_, messages) = ctx.finish();

    assert_eq!(host.plugin().calls, ["go(dest,subj)"]);
    assert_eq!(messages, ["shell handled go"]);
}

#[test]
fn registry_resolution_feeds_invocation() {
    let mut registry = PluginRegistry::new();
    registry
        .register(PluginHost::boxed(Probe::new("shell").on("show", &["subj", "obj"])))
        .unwrap();
    registry
        .register(PluginHost::boxed(
            Probe::new("gallery").on("show", &["subj", "obj", "eventSet"]),
        ))
        .unwrap();
    let grammar = Grammar::compile(
        &registry
            .iter()
            .map(|p| (p.name(), p.declarations()))
            .collect::<Vec<_>>(),
    )
    .unwrap();

    let mut world = WorldModel::new();
    let [obj, set_entity] = [world.new_entity(), world.new_entity()];
    let show = Event::new("show")
        .with_argument("subj", [world.computer()])
        .with_argument("obj", [obj])
        .with_argument("eventSet", [set_entity]);
    let set = EventSet::from(vec![show.clone()]);

    let resolution = registry.resolve(&show).unwrap();
    let plugin = registry.plugin_mut(resolution.plugin).unwrap();
    let mut ctx = WorldContext::new(&mut world, &grammar.signature, "gallery");
    plugin.invoke(resolution.entry, &show, &set, &mut ctx).unwrap();

    let (_, messages) = ctx.finish();
    assert_eq!(messages, ["gallery handled show"]);

    let probe = |name: &str| {
        registry
            .by_name(name)
            .and_then(|p| p.as_any().downcast_ref::<Probe>())
            .map(|p| p.calls.clone())
            .unwrap()
    };
    assert_eq!(probe("gallery"), ["show(eventSet,obj,subj)"]);
    assert!(probe("shell").is_empty());
}

#[test]
fn context_journals_changes() {
    let host = PluginHost::new(Probe::new("shell").on("directory", &["subj"]));
    let grammar = compiled(&[&host]);
    let mut world = WorldModel::new();
    world.clear_refresh_pending();

    let mut ctx = WorldContext::new(&mut world, &grammar.signature, "shell");
    let entity = ctx.new_entity();
    ctx.set_string_value(entity, "docs").unwrap();
    ctx.set_string_value(entity, "docs").unwrap();
    ctx.assert_event("directory", Arguments::new().with("subj", [entity]))
        .unwrap();
    let (changes, _) = ctx.finish();

    assert_eq!(changes.len(), 3);
    assert!(matches!(changes[0], WorldChange::EntityCreated(e) if e == entity));
    assert!(matches!(&changes[2], WorldChange::FactAsserted { predicate } if predicate == "directory"));
    assert!(world.refresh_pending());
    let fact = world.facts().next().unwrap();
    assert_eq!(fact.asserted_by.as_deref(), Some("shell"));
}

#[test]
fn undeclared_predicates_cannot_be_asserted() {
    let host = PluginHost::new(Probe::new("shell"));
    let grammar = compiled(&[&host]);
    let mut world = WorldModel::new();
    let user = world.user();

    let mut ctx = WorldContext::new(&mut world, &grammar.signature, "shell");
    let err = ctx
        .assert_event("sparkles", Arguments::new().with("subj", [user]))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UndeclaredPredicate(_)));
    assert_eq!(world.fact_count(), 0);
}
