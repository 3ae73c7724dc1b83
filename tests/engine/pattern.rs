//! The pattern engine against a live shell world

use parley_engine::{Engine, Grammar, LanguageEngine, VALUE_PREDICATE};
use parley_foundation::{Arguments, EntityId, ErrorCategory, Mood};
use parley_plugin::{Event, EventSet, PluginHost};
use parley_runtime::{Processor, ShellPlugin};
use parley_storage::WorldModel;
use proptest::prelude::*;

struct Session {
    engine: Engine,
    processor: Processor,
}

impl Session {
    fn new() -> Self {
        let engine = Engine::pattern();
        engine.start().unwrap();
        let mut processor =
            Processor::with_plugins(&engine, vec![PluginHost::boxed(ShellPlugin::new())])
                .unwrap();
        processor.finish_setup().unwrap();
        Self { engine, processor }
    }

    fn grammar(&self) -> &Grammar {
        self.processor.grammar().unwrap()
    }

    fn world(&self) -> &WorldModel {
        self.processor.world()
    }

    fn named(&self, name: &str) -> EntityId {
        self.world().entities_with_value(name).next().unwrap()
    }

    fn parse(&self, input: &str) -> parley_foundation::Result<parley_engine::Parse> {
        let lease = self.engine.lease()?;
        lease.backend().parse(self.grammar(), self.world(), input)
    }
}

#[test]
fn pseudo_directories_resolve_by_name() {
    let session = Session::new();
    let parse = session.parse("go up").unwrap();
    let event = parse.events.get(0).unwrap();
    assert_eq!(parse.mood, Mood::Imperative);
    assert_eq!(event.arguments_for("dest"), Some(&[session.named("up")][..]));
}

#[test]
fn declared_synonyms_share_a_property() {
    let session = Session::new();
    let folders = session.parse("show the folders").unwrap();
    let directories = session.parse("show all directories").unwrap();
    let objects = folders.events.get(0).unwrap().arguments_for("obj").unwrap();

    assert_eq!(objects.len(), 2);
    assert!(objects.contains(&session.named("root")));
    assert!(objects.contains(&session.named("home")));
    assert_eq!(folders.events, directories.events);
}

#[test]
fn parsing_leaves_the_given_world_alone() {
    let session = Session::new();
    let before = session.world().entity_count();
    let parse = session.parse("make a folder called notes").unwrap();

    assert_eq!(session.world().entity_count(), before);
    assert_eq!(parse.world.entity_count(), before + 1);
    let made = parse.events.get(0).unwrap().arguments_for("obj").unwrap()[0];
    assert_eq!(parse.world.string_value(made).unwrap(), Some("notes"));
    assert!(!session.world().contains(made));
}

#[test]
fn each_mood_parses() {
    let session = Session::new();
    let mood = |input: &str| session.parse(input).unwrap().mood;
    assert_eq!(mood("copy home to root"), Mood::Imperative);
    assert_eq!(mood("You went home."), Mood::Indicative);
    assert_eq!(mood("did you go home?"), Mood::Interrogative);
}

#[test]
fn rendering_speaks_for_the_computer() {
    let session = Session::new();
    let lease = session.engine.lease().unwrap();
    let world = session.world();
    let events = EventSet::from(vec![
        Event::new("make")
            .with_argument("subj", [world.computer()])
            .with_argument("obj", [session.named("home")]),
        Event::new("show")
            .with_argument("subj", [world.user()])
            .with_argument("obj", [session.named("root")]),
    ]);
    let text = lease.backend().render(session.grammar(), &events, world).unwrap();
    assert_eq!(text, "I made home. You showed root.");
}

#[test]
fn description_covers_facts_and_values() {
    let session = Session::new();
    let lease = session.engine.lease().unwrap();
    let world = session.world();
    let description = lease.backend().describe(world);

    assert_eq!(description.len(), world.fact_count() + world.values().count());
    assert!(description.foreground().next().is_none());
    let contains = description.find("contains", &Arguments::new());
    assert_eq!(contains.len(), 1);
    let valued = description.find(VALUE_PREDICATE, &Arguments::new());
    assert_eq!(valued.len(), world.values().count());
}

#[test]
fn parse_failures_are_unparseable_input() {
    let session = Session::new();
    for input in ["", "please", "go to", "show the", "make a folder named", "home root"] {
        let err = session.parse(input).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnparseableInput, "{input:?}");
    }
}

const WORDS: &[&str] = &[
    "go", "went", "show", "make", "copy", "move", "to", "into", "the", "a", "all", "named",
    "folder", "directories", "home", "root", "up", "back", "and", "then", "i", "you", "did",
    "don't", "please", "?", "what", "frobnicate",
];

proptest! {
    #[test]
    fn arbitrary_word_salad_parses_or_is_rejected(
        words in prop::collection::vec(prop::sample::select(WORDS), 0..8)
    ) {
        let session = Session::new();
        let input = words.join(" ");
        match session.parse(&input) {
            Ok(parse) => {
                prop_assert!(!parse.events.is_empty());
                prop_assert!(parse.world.entity_count() >= session.world().entity_count());
            }
            Err(err) => prop_assert_eq!(err.category(), ErrorCategory::UnparseableInput),
        }
    }
}
