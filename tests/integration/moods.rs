//! Mood gating happens before any handler runs.

use parley_foundation::{ErrorCategory, Mood, ProcessorCode};
use parley_plugin::PluginHost;
use parley_runtime::{Processor, ProcessorConfig, ShellPlugin};

use crate::plugins::running_engine;

const UTTERANCES: [(Mood, &str, ProcessorCode); 3] = [
    (
        Mood::Imperative,
        "make a directory named src",
        ProcessorCode::NoImperatives,
    ),
    (
        Mood::Indicative,
        "I made a directory named src.",
        ProcessorCode::NoIndicatives,
    ),
    (
        Mood::Interrogative,
        "did you make a directory named src?",
        ProcessorCode::NoInterrogatives,
    ),
];

fn config_without(mood: Mood) -> ProcessorConfig {
    let config = ProcessorConfig::new();
    match mood {
        Mood::Indicative => config.with_indicatives(false),
        Mood::Imperative => config.with_imperatives(false),
        Mood::Interrogative => config.with_interrogatives(false),
    }
}

#[test]
fn disabled_moods_change_nothing() {
    let engine = running_engine();
    for (mood, input, code) in UTTERANCES {
        let mut processor = Processor::with_plugins_and_config(
            &engine,
            vec![PluginHost::boxed(ShellPlugin::new())],
            config_without(mood),
        )
        .unwrap();
        processor.finish_setup().unwrap();
        let before = processor.world().representation();

        let err = processor.process_input(input).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::MoodRejected, "{input}");
        assert_eq!(err.code(), Some(code));
        assert!(!err.is_fatal());
        assert_eq!(processor.world().representation(), before);
        assert_eq!(processor.world().entities_with_value("src").count(), 0);

        let handled = processor.plugin::<ShellPlugin>("shell").unwrap().handled();
        assert_eq!(handled, 0);
    }
}

#[test]
fn other_moods_stay_open() {
    let engine = running_engine();
    for (disabled, _, _) in UTTERANCES {
        let mut processor = Processor::with_plugins_and_config(
            &engine,
            vec![PluginHost::boxed(ShellPlugin::new())],
            config_without(disabled),
        )
        .unwrap();
        processor.finish_setup().unwrap();

        for (mood, input, _) in UTTERANCES {
            let result = processor.process_input(input);
            assert_eq!(result.is_ok(), mood != disabled, "{input} with {disabled:?} off");
            if let Ok(report) = result {
                assert_eq!(report.mood, mood);
            }
        }
    }
}

#[test]
fn moods_toggle_between_cycles() {
    let engine = running_engine();
    let mut processor =
        Processor::with_plugins(&engine, vec![PluginHost::boxed(ShellPlugin::new())]).unwrap();
    processor.finish_setup().unwrap();

    processor.set_accepts_imperatives(false);
    assert!(!processor.config().accepts(Mood::Imperative));
    assert!(processor.process_input("show").is_err());

    processor.set_accepts_imperatives(true);
    assert!(processor.process_input("show").is_ok());

    processor.set_accepts_interrogatives(false);
    let err = processor.process_input("did you go home?").unwrap_err();
    assert_eq!(err.code(), Some(ProcessorCode::NoInterrogatives));
    assert!(!processor.is_poisoned());
}
