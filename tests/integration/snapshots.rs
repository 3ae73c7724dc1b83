//! Saving a conversation's world and resuming it elsewhere.

use std::path::PathBuf;

use parley_foundation::{ErrorCategory, ErrorKind};
use parley_plugin::{Event, PluginHost};
use parley_runtime::serialize::{from_bytes, to_bytes};
use parley_runtime::shell::current_directory;
use parley_runtime::{Processor, ShellPlugin};

use crate::plugins::running_engine;

fn shell(engine: &parley_engine::Engine) -> Processor {
    let mut processor =
        Processor::with_plugins(engine, vec![PluginHost::boxed(ShellPlugin::new())]).unwrap();
    processor.finish_setup().unwrap();
    processor
}

fn snapshot_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("parley-{name}-{}.mp", std::process::id()))
}

#[test]
fn a_saved_world_resumes_in_another_processor() {
    let engine = running_engine();
    let path = snapshot_path("resume");

    let mut first = shell(&engine);
    first.process_input("make a directory named src").unwrap();
    first.process_input("go to src").unwrap();
    first.save_world(&path).unwrap();

    let mut second = shell(&engine);
    second.load_world(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let here = current_directory(second.world()).unwrap();
    assert_eq!(second.world().string_value(here).unwrap(), Some("src"));
    assert_eq!(second.world().fact_count(), first.world().fact_count());

    let report = second.process_input("go up").unwrap();
    assert!(report.is_success());
    let here = current_directory(second.world()).unwrap();
    assert_eq!(second.world().string_value(here).unwrap(), Some("home"));
}

#[test]
fn entities_from_before_a_load_are_foreign() {
    let engine = running_engine();
    let path = snapshot_path("foreign");
    let mut processor = shell(&engine);
    let old_home = processor.world().entities_with_value("home").next().unwrap();
    processor.save_world(&path).unwrap();
    processor.load_world(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let event = Event::new("go")
        .with_argument("subj", [processor.world().computer()])
        .with_argument("dest", [old_home]);
    let err = processor.dispatch_event(&event).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ForeignEntity(e) if e == old_home));

    let err = processor.assert_entity_string_value(old_home, "house").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ForeignEntity(_)));
}

#[test]
fn description_is_rebuilt_after_a_load() {
    let engine = running_engine();
    let path = snapshot_path("describe");
    let mut processor = shell(&engine);
    processor.process_input("make a directory named src").unwrap();
    let before = processor.world_model_description().unwrap();
    processor.save_world(&path).unwrap();
    processor.load_world(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let after = processor.world_model_description().unwrap();
    assert_eq!(after.len(), before.len());
    assert_ne!(after, before);
}

#[test]
fn bytes_round_trip_keeps_content_not_identity() {
    let engine = running_engine();
    let mut processor = shell(&engine);
    processor.process_input("make a directory named src").unwrap();
    let world = processor.world();

    let restored = from_bytes(&to_bytes(world).unwrap()).unwrap();
    assert_ne!(restored.id(), world.id());
    assert_eq!(restored.entity_count(), world.entity_count());
    assert_eq!(restored.fact_count(), world.fact_count());
    let values = |w: &parley_storage::WorldModel| -> Vec<String> {
        w.values().map(|(_, v)| v.to_string()).collect()
    };
    assert_eq!(values(&restored), values(world));
}

#[test]
fn corrupt_snapshots_are_rejected() {
    let err = from_bytes(b"not a snapshot").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationError(_)));
    assert_eq!(err.category(), ErrorCategory::Other);

    let engine = running_engine();
    let mut processor = shell(&engine);
    let err = processor.load_world(snapshot_path("missing")).unwrap_err();
    assert!(!err.is_fatal());
    assert!(!processor.is_poisoned());
}
