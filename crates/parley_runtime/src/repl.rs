//! The interactive REPL.

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::processor::Processor;
use crate::report::CycleReport;
use parley_debug::TraceOutput;
use parley_foundation::{Error, ErrorKind, Result};
use std::fs;
use std::path::Path;

const HELP: &str = "\
Type an English sentence, or one of:
  :help              show this text
  :quit              leave
  :world             dump the world model
  :describe          the world described as events
  :parse TEXT        parse TEXT without running handlers
  :signature         the compiled signature
  :lexicon           the compiled lexicon
  :trace on|off      echo trace records to stderr
  :trace json|text   choose the trace format
  :trace show        print buffered trace records
  :trace clear       drop buffered trace records
  :save FILE         write a world snapshot
  :load FILE         replace the world with a snapshot";

/// What one line of input produced.
#[derive(Debug)]
pub enum Reply {
    /// Text for the user; may be empty.
    Text(String),
    /// A processing cycle ran.
    Cycle(CycleReport),
    /// The user asked to leave.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The processor every utterance goes through.
    processor: Processor,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(processor: Processor) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, processor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E, processor: Processor) -> Self {
        Self {
            editor,
            processor,
            show_banner: true,
            prompt: "> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the processor.
    #[must_use]
    pub const fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Returns a mutable reference to the processor.
    pub fn processor_mut(&mut self) -> &mut Processor {
        &mut self.processor
    }

    /// Gives the processor back, e.g. for shutdown.
    pub fn into_processor(self) -> Processor {
        self.processor
    }

    /// Runs the REPL loop until `:quit`, EOF, or a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails, or the processor is poisoned
    /// or stopped.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }
        self.refresh_keywords();

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if e.is_fatal() => {
                    self.print_error(&e);
                    return Err(e);
                }
                Err(e) => self.print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let input = match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => {
                println!();
                return Ok(true);
            }
            ReadResult::Eof => return Ok(false),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(true);
        }
        self.editor.add_history(trimmed);

        let reply = self.eval(trimmed)?;
        Ok(self.print_reply(reply))
    }

    /// Evaluates a script line by line, skipping blank lines and `#`
    /// comments. Non-fatal errors are printed and the script continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line fails fatally.
    pub fn eval_file(&mut self, path: &Path) -> Result<()> {
        let script = fs::read_to_string(path).map_err(|e| {
            Error::new(ErrorKind::IoError(format!(
                "failed to read '{}': {e}",
                path.display()
            )))
        })?;

        for line in script.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            println!("{}{line}", self.prompt);
            match self.eval(line) {
                Ok(reply) => {
                    if !self.print_reply(reply) {
                        break;
                    }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => self.print_error(&e),
            }
        }
        Ok(())
    }

    /// Prints a reply; returns false for [`Reply::Quit`].
    fn print_reply(&self, reply: Reply) -> bool {
        match reply {
            Reply::Quit => return false,
            Reply::Text(text) => {
                if !text.is_empty() {
                    println!("{text}");
                }
            }
            Reply::Cycle(report) => self.print_report(&report),
        }
        true
    }

    /// Evaluates one line: a meta-command or an utterance.
    ///
    /// # Errors
    ///
    /// Returns whatever the processor or the command reports. Per-event
    /// handler failures are inside the returned [`CycleReport`], not here.
    pub fn eval(&mut self, input: &str) -> Result<Reply> {
        let input = input.trim();
        if let Some(command) = input.strip_prefix(':') {
            let (name, arg) = command
                .split_once(char::is_whitespace)
                .map_or((command, ""), |(n, a)| (n, a.trim()));
            return self.meta(name, arg);
        }
        let report = self.processor.process_input(input)?;
        if report.mutated {
            self.refresh_keywords();
        }
        Ok(Reply::Cycle(report))
    }

    fn meta(&mut self, name: &str, arg: &str) -> Result<Reply> {
        let text = match name {
            "help" | "h" | "?" => HELP.to_string(),
            "quit" | "q" | "exit" => return Ok(Reply::Quit),
            "world" => self.processor.world_model_representation()?,
            "describe" => self
                .processor
                .world_model_description()?
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            "parse" => {
                let events = self.processor.event_set_for_input(arg)?;
                events.to_string()
            }
            "signature" => self.processor.signature_representation()?,
            "lexicon" => self.processor.lexicon_representation()?,
            "trace" => self.trace(arg)?,
            "save" => {
                let path = required(name, arg)?;
                self.processor.save_world(path)?;
                format!("Saved world to {path}")
            }
            "load" => {
                let path = required(name, arg)?;
                self.processor.load_world(path)?;
                self.refresh_keywords();
                format!("Loaded world from {path}")
            }
            _ => {
                return Err(Error::invalid_input(
                    format!(":{name}"),
                    "unknown command; try :help",
                ));
            }
        };
        Ok(Reply::Text(text))
    }

    fn trace(&mut self, arg: &str) -> Result<String> {
        let tracer = self.processor.tracer_mut();
        let text = match arg {
            "" => format!(
                "tracing is {}",
                if tracer.is_enabled() { "on" } else { "off" }
            ),
            "on" => {
                tracer.enable();
                tracer.set_output(TraceOutput::Stderr);
                "tracing on".to_string()
            }
            "off" => {
                tracer.disable();
                "tracing off".to_string()
            }
            "json" => {
                tracer.set_json_format(true);
                "trace format: json".to_string()
            }
            "text" => {
                tracer.set_json_format(false);
                "trace format: text".to_string()
            }
            "show" => {
                let records: Vec<_> = tracer.buffer().iter().collect();
                tracer.format_records(&records)
            }
            "clear" => {
                tracer.clear();
                "trace buffer cleared".to_string()
            }
            other => {
                return Err(Error::invalid_input(
                    format!(":trace {other}"),
                    "expected on, off, json, text, show, or clear",
                ));
            }
        };
        Ok(text)
    }

    /// Offers every lexicon form and every string value for completion.
    fn refresh_keywords(&mut self) {
        let mut words: Vec<String> = self
            .processor
            .grammar()
            .map(|g| g.lexicon.iter().map(|(form, _, _)| form.to_string()).collect())
            .unwrap_or_default();
        words.extend(self.processor.world().values().map(|(_, v)| v.to_string()));
        words.sort();
        words.dedup();
        self.editor.set_keywords(words);
    }

    fn print_report(&self, report: &CycleReport) {
        if !report.output.is_empty() {
            println!("\x1b[1m{}\x1b[0m", report.output);
        }
        for (index, error) in report.failures() {
            let predicate = report.events.get(index).map_or("?", |e| e.predicate());
            eprintln!("\x1b[31m[{}] {predicate}: {error}\x1b[0m", index + 1);
        }
    }

    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36m");
        println!("  parley {}", env!("CARGO_PKG_VERSION"));
        println!("  Talk to the shell in English. :help lists commands.");
        println!("\x1b[0m");
    }
}

fn required<'a>(command: &str, arg: &'a str) -> Result<&'a str> {
    if arg.is_empty() {
        Err(Error::invalid_input(
            format!(":{command}"),
            "expected a file name",
        ))
    } else {
        Ok(arg)
    }
}
