//! A scripted REPL session with the shell plugin.

use std::collections::VecDeque;

use parley_foundation::{ErrorCategory, Result};
use parley_plugin::PluginHost;
use parley_runtime::shell::{contents, current_directory};
use parley_runtime::{LineEditor, Processor, ReadResult, Repl, Reply, ShellPlugin};

use crate::plugins::running_engine;

#[derive(Default)]
struct Script {
    lines: VecDeque<String>,
    history: Vec<String>,
    keywords: Vec<String>,
}

impl Script {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| (*l).to_string()).collect(),
            ..Self::default()
        }
    }
}

impl LineEditor for Script {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self
            .lines
            .pop_front()
            .map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    fn set_keywords(&mut self, keywords: Vec<String>) {
        self.keywords = keywords;
    }
}

fn repl(engine: &parley_engine::Engine, lines: &[&str]) -> Repl<Script> {
    let mut processor =
        Processor::with_plugins(engine, vec![PluginHost::boxed(ShellPlugin::new())]).unwrap();
    processor.finish_setup().unwrap();
    Repl::with_editor(Script::new(lines), processor).without_banner()
}

fn named(processor: &Processor, name: &str) -> parley_foundation::EntityId {
    processor.world().entities_with_value(name).next().unwrap()
}

fn output(reply: Reply) -> String {
    match reply {
        Reply::Cycle(report) => report.output,
        Reply::Text(text) => text,
        Reply::Quit => panic!("unexpected quit"),
    }
}

#[test]
fn a_session_builds_a_tree() {
    let engine = running_engine();
    let mut repl = repl(
        &engine,
        &[
            "make a directory named src",
            "go to src",
            "make a directory named lib",
            "go to nowhere",
            "show",
            ":world",
            "go up",
            "show src",
            ":quit",
            "make a directory named never",
        ],
    );
    repl.run().unwrap();

    let processor = repl.processor();
    let src = named(processor, "src");
    let lib = named(processor, "lib");
    assert_eq!(processor.cycle(), 7);
    assert_eq!(contents(processor.world(), src), [lib]);
    assert_eq!(
        current_directory(processor.world()),
        Some(named(processor, "home"))
    );
    assert_eq!(processor.world().entities_with_value("never").count(), 0);
}

#[test]
fn replies_carry_output_and_meta_text() {
    let engine = running_engine();
    let mut repl = repl(&engine, &[]);

    let text = output(repl.eval("make a directory named src").unwrap());
    assert!(text.contains("I made src"), "{text}");
    assert!(output(repl.eval("show").unwrap()).ends_with("home: src"));

    let signature = output(repl.eval(":signature").unwrap());
    assert!(signature.contains("relation contains [shell]"));
    assert!(
        signature.contains("handlers shell: go, show, make, move, copy"),
        "{signature}"
    );
    let lexicon = output(repl.eval(":lexicon").unwrap());
    assert!(lexicon.contains("folders count-noun [plural] -> directory"));
    let parsed = output(repl.eval(":parse go to src").unwrap());
    assert!(parsed.starts_with("go"), "{parsed}");

    assert!(matches!(repl.eval(":q").unwrap(), Reply::Quit));
}

#[test]
fn moving_and_copying_reshape_the_tree() {
    let engine = running_engine();
    let mut repl = repl(&engine, &[]);
    for line in [
        "make a directory named src",
        "make a directory named docs",
        "go to src",
        "make a directory named lib",
    ] {
        let Reply::Cycle(report) = repl.eval(line).unwrap() else {
            panic!("{line} did not run a cycle");
        };
        assert!(report.is_success(), "{line}: {}", report.output);
    }

    let Reply::Cycle(report) = repl.eval("move lib to docs").unwrap() else {
        panic!("move did not run a cycle");
    };
    assert!(report.is_success(), "{}", report.output);
    let Reply::Cycle(report) = repl.eval("copy docs to src").unwrap() else {
        panic!("copy did not run a cycle");
    };
    assert!(report.is_success(), "{}", report.output);

    let processor = repl.processor();
    let src = named(processor, "src");
    let docs = named(processor, "docs");
    let lib = named(processor, "lib");
    assert_eq!(contents(processor.world(), docs), [lib]);
    assert_eq!(contents(processor.world(), src).len(), 1);
    assert_eq!(processor.world().entities_with_value("lib").count(), 2);
}

#[test]
fn handler_refusals_are_reported_per_event() {
    let engine = running_engine();
    let mut repl = repl(&engine, &[]);
    repl.eval("make a directory named src").unwrap();

    let Reply::Cycle(report) = repl.eval("go to src and go up and go to src").unwrap() else {
        panic!("expected a cycle");
    };
    assert!(report.is_success());

    let Reply::Cycle(report) = repl.eval("move src to src").unwrap() else {
        panic!("expected a cycle");
    };
    assert!(!report.is_success());
    let (index, error) = report.failures().next().unwrap();
    assert_eq!(index, 0);
    assert_eq!(error.category(), ErrorCategory::InvalidEvent);
    assert!(error.to_string().contains("into itself"));

    repl.eval("go home").unwrap();
    let Reply::Cycle(report) = repl
        .eval("make a directory named lib and a directory named src")
        .unwrap()
    else {
        panic!("expected a cycle");
    };
    let (_, error) = report.failures().next().unwrap();
    assert!(error.to_string().contains("already has a directory named src"));
    assert!(!output(repl.eval("show").unwrap()).contains("lib"));

    let err = repl.eval(":nonsense").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnparseableInput);
    assert!(!repl.processor().is_poisoned());
}
