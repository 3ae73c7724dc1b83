//! The processor: one entry point from text to handlers and back.
//!
//! ```text
//! Uninitialized ──add_plugin──▶ Configuring ──finish_setup──▶ Ready
//!       │                                                     │  ▲
//!       │                                       process_input │  │
//!       │                                                     ▼  │
//!       │                                                 Processing
//!       └──────────────shutdown──────────▶ Stopped ◀──shutdown──┘ (from Ready)
//! ```
//!
//! A setup conflict or any lifecycle violation poisons the processor; every
//! later call fails with [`LifecycleViolation::Poisoned`]. A poisoned
//! processor can still be shut down to release its engine lease.

use std::fmt;
use std::fmt::Write as _;
use std::path::Path;

use parley_debug::{TraceEvent, Tracer};
use parley_engine::{Engine, EngineLease, Grammar, LanguageEngine};
use parley_foundation::{
    Arguments, EntityId, Error, ErrorCategory, ErrorKind, LifecycleViolation, Mood, Result,
};
use parley_plugin::{
    DynPlugin, Event, EventSet, Plugin, PluginRegistry, SymbolLookup, WorldChange, WorldContext,
};
use parley_storage::{Fact, WorldModel};

use crate::config::ProcessorConfig;
use crate::report::{CycleReport, EventOutcome};
use crate::serialize;

/// Where a processor is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProcessorState {
    /// Created with no plugins.
    Uninitialized,
    /// Plugins are being added.
    Configuring,
    /// The grammar is compiled; input can be processed.
    Ready,
    /// A cycle is running.
    Processing,
    /// Shut down; nothing further is valid.
    Stopped,
}

impl ProcessorState {
    /// Lower-case name used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Configuring => "configuring",
            Self::Ready => "ready",
            Self::Processing => "processing",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const LIVE: &[ProcessorState] = &[
    ProcessorState::Uninitialized,
    ProcessorState::Configuring,
    ProcessorState::Ready,
];
const SETTING_UP: &[ProcessorState] = &[ProcessorState::Uninitialized, ProcessorState::Configuring];
const CONFIGURED: &[ProcessorState] = &[ProcessorState::Configuring, ProcessorState::Ready];
const READY: &[ProcessorState] = &[ProcessorState::Ready];

/// Orchestrates plugins, grammar, and world model for one conversation.
pub struct Processor {
    state: ProcessorState,
    poisoned: bool,
    config: ProcessorConfig,
    lease: Option<EngineLease>,
    registry: PluginRegistry,
    grammar: Option<Grammar>,
    world: WorldModel,
    description: EventSet,
    cycle: u64,
    tracer: Tracer,
}

impl Processor {
    /// Creates an uninitialized processor with the default configuration.
    ///
    /// # Errors
    ///
    /// Fails unless `engine` is running.
    pub fn new(engine: &Engine) -> Result<Self> {
        Self::with_config(engine, ProcessorConfig::default())
    }

    /// Creates an uninitialized processor.
    pub fn with_config(engine: &Engine, config: ProcessorConfig) -> Result<Self> {
        let lease = engine.lease()?;
        let tracer = Tracer::new(config.tracer.clone());
        Ok(Self {
            state: ProcessorState::Uninitialized,
            poisoned: false,
            config,
            lease: Some(lease),
            registry: PluginRegistry::new(),
            grammar: None,
            world: WorldModel::new(),
            description: EventSet::new(),
            cycle: 0,
            tracer,
        })
    }

    /// Creates a configuring processor holding `plugins` in order.
    pub fn with_plugins(engine: &Engine, plugins: Vec<Box<dyn DynPlugin>>) -> Result<Self> {
        Self::with_plugins_and_config(engine, plugins, ProcessorConfig::default())
    }

    /// Creates a configuring processor with an explicit configuration.
    pub fn with_plugins_and_config(
        engine: &Engine,
        plugins: Vec<Box<dyn DynPlugin>>,
        config: ProcessorConfig,
    ) -> Result<Self> {
        let mut processor = Self::with_config(engine, config)?;
        processor.state = ProcessorState::Configuring;
        for plugin in plugins {
            processor.add_plugin(plugin)?;
        }
        Ok(processor)
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Appends a plugin. Only valid before setup finishes.
    pub fn add_plugin(&mut self, plugin: Box<dyn DynPlugin>) -> Result<usize> {
        self.enter("add a plugin", SETTING_UP)?;
        let index = self.registry.register(plugin)?;
        self.state = ProcessorState::Configuring;
        Ok(index)
    }

    /// Compiles the grammar and runs every plugin's setup hook.
    ///
    /// # Errors
    ///
    /// A second call, a declaration conflict, or a failing setup hook is
    /// fatal.
    pub fn finish_setup(&mut self) -> Result<()> {
        if self.state == ProcessorState::Ready && !self.poisoned {
            return Err(self.poison(Error::lifecycle(LifecycleViolation::AlreadySetUp)));
        }
        self.enter("finish setup", &[ProcessorState::Configuring])?;

        let compiled = {
            let lease = self.lease()?;
            let declarations: Vec<_> = self
                .registry
                .iter()
                .map(|p| (p.name(), p.declarations()))
                .collect();
            lease.backend().compile(&declarations)
        };
        let grammar = compiled.map_err(|e| self.poison(e))?;

        let hooks = self.run_hooks(&grammar, Hook::Setup);
        hooks.map_err(|e| self.poison(e))?;

        self.tracer.record(TraceEvent::SetupFinished {
            plugins: self.registry.len(),
            symbols: grammar.signature.len(),
            words: grammar.lexicon.len(),
        });
        self.grammar = Some(grammar);
        self.state = ProcessorState::Ready;
        Ok(())
    }

    /// Enables or disables indicative input.
    pub fn set_accepts_indicatives(&mut self, accept: bool) {
        self.config.set_accepts(Mood::Indicative, accept);
    }

    /// Enables or disables imperative input.
    pub fn set_accepts_imperatives(&mut self, accept: bool) {
        self.config.set_accepts(Mood::Imperative, accept);
    }

    /// Enables or disables interrogative input.
    pub fn set_accepts_interrogatives(&mut self, accept: bool) {
        self.config.set_accepts(Mood::Interrogative, accept);
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Runs one cycle: parse, gate on mood, dispatch every event in order,
    /// and render the result.
    ///
    /// # Errors
    ///
    /// Mood rejection and unparseable input abort the cycle and leave the
    /// world untouched. Dispatch failures and invalid events are recorded
    /// per event in the report instead.
    pub fn process_input(&mut self, input: &str) -> Result<CycleReport> {
        self.enter("process input", READY)?;
        self.cycle += 1;
        let cycle = self.cycle;
        self.tracer.cycle_start(cycle, input);

        self.state = ProcessorState::Processing;
        let result = self.run_cycle(cycle, input);
        self.state = ProcessorState::Ready;
        result
    }

    /// Processes `input` and returns only the output text.
    pub fn results_for_input(&mut self, input: &str) -> Result<String> {
        self.process_input(input).map(|report| report.output)
    }

    /// Parses `input` and commits the parse's world without dispatching.
    ///
    /// # Errors
    ///
    /// Fails like [`Processor::process_input`] on unparseable input or a
    /// disabled mood.
    pub fn event_set_for_input(&mut self, input: &str) -> Result<EventSet> {
        self.enter("parse input", READY)?;
        let Self {
            lease,
            grammar,
            world,
            tracer,
            config,
            ..
        } = self;
        let (backend, grammar) = engine_parts(lease.as_ref(), grammar.as_ref())?;
        let parse = backend.parse(grammar, world, input)?;
        tracer.parsed(parse.mood, parse.events.len());
        if !config.accepts(parse.mood) {
            tracer.record(TraceEvent::MoodRejected { mood: parse.mood });
            return Err(Error::mood_rejected(parse.mood));
        }
        *world = parse.world;
        Ok(parse.events)
    }

    /// Resolves and runs a single event outside any parse.
    ///
    /// # Errors
    ///
    /// Fails if the event mentions an entity of another world. Dispatch and
    /// handler failures are reported in the outcome.
    pub fn dispatch_event(&mut self, event: &Event) -> Result<EventOutcome> {
        self.enter("dispatch an event", READY)?;
        for entity in event.arguments().entities() {
            self.world.validate(entity)?;
        }
        let Self {
            registry,
            grammar,
            world,
            tracer,
            ..
        } = self;
        let grammar = grammar.as_ref().ok_or_else(missing_grammar)?;
        let events = EventSet::from(vec![event.clone()]);
        Ok(dispatch(
            registry,
            &grammar.signature,
            world,
            tracer,
            event,
            &events,
        ))
    }

    fn run_cycle(&mut self, cycle: u64, input: &str) -> Result<CycleReport> {
        let Self {
            lease,
            grammar,
            world,
            registry,
            tracer,
            config,
            ..
        } = self;
        let (backend, grammar) = engine_parts(lease.as_ref(), grammar.as_ref())?;

        let parse = match backend.parse(grammar, world, input) {
            Ok(parse) => parse,
            Err(error) => {
                tracer.record(TraceEvent::ParseFailed {
                    message: error.to_string(),
                });
                tracer.cycle_end(cycle, 1, false);
                return Err(error);
            }
        };
        tracer.parsed(parse.mood, parse.events.len());
        if !config.accepts(parse.mood) {
            tracer.record(TraceEvent::MoodRejected { mood: parse.mood });
            tracer.cycle_end(cycle, 1, false);
            return Err(Error::mood_rejected(parse.mood));
        }

        let revision = world.revision();
        *world = parse.world;
        let events = parse.events;

        let outcomes: Vec<EventOutcome> = events
            .iter()
            .map(|event| dispatch(registry, &grammar.signature, world, tracer, event, &events))
            .collect();
        let mutated = world.revision() != revision;

        let succeeded: EventSet = events
            .iter()
            .zip(&outcomes)
            .filter(|(_, outcome)| outcome.is_success())
            .map(|(event, _)| event.clone())
            .collect();
        let mut lines = vec![backend.render(grammar, &succeeded, world)?];
        lines.extend(outcomes.iter().flat_map(|o| o.messages.iter().cloned()));
        lines.retain(|line| !line.is_empty());

        let failures = outcomes.iter().filter(|o| !o.is_success()).count();
        tracer.cycle_end(cycle, failures, mutated);

        Ok(CycleReport {
            cycle,
            mood: parse.mood,
            events,
            outcomes,
            output: lines.join("\n"),
            mutated,
        })
    }

    // =========================================================================
    // World model
    // =========================================================================

    /// Allocates a fresh entity with no value.
    pub fn new_entity(&mut self) -> Result<EntityId> {
        self.enter("create an entity", LIVE)?;
        let entity = self.world.new_entity();
        self.tracer.entity_created(entity, None);
        Ok(entity)
    }

    /// The string value of `entity`.
    pub fn entity_string_value(&mut self, entity: EntityId) -> Result<Option<String>> {
        self.enter("read an entity", LIVE)?;
        Ok(self.world.string_value(entity)?.map(str::to_string))
    }

    /// Sets the string value of `entity`. Writing the current value again
    /// changes nothing and leaves the description cached.
    pub fn assert_entity_string_value(&mut self, entity: EntityId, value: &str) -> Result<()> {
        self.enter("write an entity", LIVE)?;
        if self.world.set_string_value(entity, value)? {
            self.tracer.value_written(entity, value, None);
        }
        Ok(())
    }

    /// Asserts a fact with a declared predicate on behalf of `sender`.
    ///
    /// # Errors
    ///
    /// Fails with an undeclared-predicate error when no registered plugin
    /// declares `predicate`.
    pub fn assert_event_predicate(
        &mut self,
        predicate: &str,
        arguments: Arguments,
        sender: Option<&str>,
    ) -> Result<()> {
        self.enter("assert an event predicate", CONFIGURED)?;
        let declared = match &self.grammar {
            Some(grammar) => grammar.signature.is_declared(predicate),
            None => self
                .registry
                .iter()
                .any(|p| p.declarations().is_declared(predicate)),
        };
        if !declared {
            return Err(Error::undeclared_predicate(predicate));
        }

        let mut fact = Fact::new(predicate, arguments);
        if let Some(sender) = sender {
            fact = fact.asserted_by(sender);
        }
        self.world.assert_fact(fact)?;
        self.tracer.fact_asserted(predicate, sender);
        Ok(())
    }

    /// The world description, regenerated first if anything changed since
    /// the last read.
    pub fn world_model_description(&mut self) -> Result<EventSet> {
        self.enter("describe the world", READY)?;
        if self.world.refresh_pending() {
            self.regenerate_description()?;
        }
        Ok(self.description.clone())
    }

    /// Regenerates the world description now.
    pub fn refresh_world_model(&mut self) -> Result<()> {
        self.enter("refresh the world", READY)?;
        self.regenerate_description()
    }

    /// Marks the cached description stale.
    pub fn set_should_refresh_world_model(&mut self) -> Result<()> {
        self.enter("invalidate the description", LIVE)?;
        self.world.mark_refresh_pending();
        Ok(())
    }

    fn regenerate_description(&mut self) -> Result<()> {
        let grammar = self.grammar.take().ok_or_else(missing_grammar)?;
        let hooks = self.run_hooks(&grammar, Hook::AnalyzeWorld);
        self.grammar = Some(grammar);
        hooks?;

        self.description = self.lease()?.backend().describe(&self.world);
        self.world.clear_refresh_pending();
        self.tracer.record(TraceEvent::DescriptionRefreshed {
            events: self.description.len(),
        });
        Ok(())
    }

    fn run_hooks(&mut self, grammar: &Grammar, hook: Hook) -> Result<()> {
        let Self {
            registry,
            world,
            tracer,
            ..
        } = self;
        for plugin in registry.iter_mut() {
            let name = plugin.name().to_string();
            let mut context = WorldContext::new(world, &grammar.signature, &name);
            let result = match hook {
                Hook::Setup => plugin.setup(&mut context),
                Hook::AnalyzeWorld => plugin.analyze_world(&mut context),
            };
            let (changes, _) = context.finish();
            trace_changes(tracer, &changes, &name);
            result?;
        }
        Ok(())
    }

    // =========================================================================
    // Representations and snapshots
    // =========================================================================

    /// Text dump of the compiled signature.
    pub fn signature_representation(&mut self) -> Result<String> {
        self.enter("show the signature", READY)?;
        let grammar = self.grammar.as_ref().ok_or_else(missing_grammar)?;
        let mut out = grammar.signature.representation();
        for plugin in self.registry.iter() {
            let _ = writeln!(
                out,
                "handlers {}: {}",
                plugin.name(),
                plugin.handled_predicates().join(", ")
            );
        }
        Ok(out)
    }

    /// Text dump of the compiled lexicon.
    pub fn lexicon_representation(&mut self) -> Result<String> {
        self.enter("show the lexicon", READY)?;
        let grammar = self.grammar.as_ref().ok_or_else(missing_grammar)?;
        Ok(grammar.lexicon.representation())
    }

    /// Text dump of the world model.
    pub fn world_model_representation(&mut self) -> Result<String> {
        self.enter("show the world", LIVE)?;
        Ok(self.world.representation())
    }

    /// Writes a snapshot of the world model.
    pub fn save_world(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.enter("save the world", LIVE)?;
        serialize::save_to_file(&self.world, path)
    }

    /// Replaces the world model with a snapshot.
    ///
    /// The loaded world gets a fresh identity, so entities from the old
    /// world become foreign.
    pub fn load_world(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.enter("load a world", LIVE)?;
        self.world = serialize::load_from_file(path)?;
        self.description = EventSet::new();
        Ok(())
    }

    // =========================================================================
    // Shutdown
    // =========================================================================

    /// Releases the engine lease, plugins, grammar, and world.
    ///
    /// Valid from `Uninitialized` or `Ready`, or at any point once poisoned.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.state == ProcessorState::Stopped {
            return Err(Error::lifecycle(LifecycleViolation::Stopped));
        }
        let allowed = matches!(
            self.state,
            ProcessorState::Uninitialized | ProcessorState::Ready
        );
        if !self.poisoned && !allowed {
            return Err(self.poison(Error::lifecycle(LifecycleViolation::WrongState {
                operation: "shut down",
                state: self.state.name(),
            })));
        }

        self.lease = None;
        self.registry = PluginRegistry::new();
        self.grammar = None;
        self.world = WorldModel::new();
        self.description = EventSet::new();
        self.state = ProcessorState::Stopped;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// Returns true after a fatal error.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Number of cycles started so far.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Read access to the world model.
    #[must_use]
    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    /// The compiled grammar, once setup has finished.
    #[must_use]
    pub fn grammar(&self) -> Option<&Grammar> {
        self.grammar.as_ref()
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Names of the registered plugins in registration order.
    #[must_use]
    pub fn plugin_names(&self) -> Vec<&str> {
        self.registry.iter().map(|p| p.name()).collect()
    }

    /// The plugin named `name`, if it has type `P`.
    #[must_use]
    pub fn plugin<P: Plugin>(&self, name: &str) -> Option<&P> {
        self.registry.by_name(name)?.as_any().downcast_ref::<P>()
    }

    /// The processor's tracer.
    #[must_use]
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Mutable access to the tracer.
    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    // =========================================================================
    // Guards
    // =========================================================================

    fn enter(&mut self, operation: &'static str, allowed: &[ProcessorState]) -> Result<()> {
        if self.state == ProcessorState::Stopped {
            return Err(Error::lifecycle(LifecycleViolation::Stopped));
        }
        if self.poisoned {
            return Err(Error::lifecycle(LifecycleViolation::Poisoned));
        }
        if !allowed.contains(&self.state) {
            return Err(self.poison(Error::lifecycle(LifecycleViolation::WrongState {
                operation,
                state: self.state.name(),
            })));
        }
        Ok(())
    }

    fn poison(&mut self, error: Error) -> Error {
        self.poisoned = true;
        error
    }

    fn lease(&self) -> Result<&EngineLease> {
        self.lease
            .as_ref()
            .ok_or_else(|| Error::lifecycle(LifecycleViolation::EngineNotRunning))
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("state", &self.state)
            .field("poisoned", &self.poisoned)
            .field("plugins", &self.plugin_names())
            .field("cycle", &self.cycle)
            .field("world", &self.world.id())
            .finish_non_exhaustive()
    }
}

#[derive(Copy, Clone)]
enum Hook {
    Setup,
    AnalyzeWorld,
}

fn missing_grammar() -> Error {
    Error::new(ErrorKind::Internal("processor has no compiled grammar".to_string()))
}

fn engine_parts<'a>(
    lease: Option<&'a EngineLease>,
    grammar: Option<&'a Grammar>,
) -> Result<(&'a dyn LanguageEngine, &'a Grammar)> {
    let lease = lease.ok_or_else(|| Error::lifecycle(LifecycleViolation::EngineNotRunning))?;
    let grammar = grammar.ok_or_else(missing_grammar)?;
    Ok((lease.backend(), grammar))
}

/// Resolves and runs one event.
///
/// A failing handler's world changes are rolled back; its messages are kept.
fn dispatch(
    registry: &mut PluginRegistry,
    symbols: &dyn SymbolLookup,
    world: &mut WorldModel,
    tracer: &mut Tracer,
    event: &Event,
    events: &EventSet,
) -> EventOutcome {
    let predicate = event.predicate();
    let resolution = match registry.resolve(event) {
        Ok(resolution) => resolution,
        Err(error) => {
            tracer.record(TraceEvent::DispatchFailed {
                predicate: predicate.to_string(),
                message: error.to_string(),
            });
            return EventOutcome {
                plugin: None,
                error: Some(error),
                messages: Vec::new(),
            };
        }
    };
    let Some(plugin) = registry.plugin_mut(resolution.plugin) else {
        return EventOutcome {
            plugin: None,
            error: Some(Error::new(ErrorKind::Internal(format!(
                "resolved to missing plugin {}",
                resolution.plugin
            )))),
            messages: Vec::new(),
        };
    };
    let name = plugin.name().to_string();
    tracer.dispatched(predicate, &name, resolution.specificity);

    let before = world.clone();
    let mut context = WorldContext::new(world, symbols, &name);
    let result = plugin.invoke(resolution.entry, event, events, &mut context);
    let (changes, messages) = context.finish();

    let error = match result {
        Ok(()) => {
            trace_changes(tracer, &changes, &name);
            None
        }
        Err(error) => {
            *world = before;
            let error = if error.category() == ErrorCategory::InvalidEvent {
                error
            } else {
                Error::invalid_event(predicate, error.to_string())
            };
            tracer.record(TraceEvent::HandlerFailed {
                predicate: predicate.to_string(),
                plugin: name.clone(),
                message: error.to_string(),
            });
            Some(error)
        }
    };

    EventOutcome {
        plugin: Some(name),
        error,
        messages,
    }
}

fn trace_changes(tracer: &mut Tracer, changes: &[WorldChange], plugin: &str) {
    if !tracer.is_enabled() {
        return;
    }
    for change in changes {
        match change {
            WorldChange::EntityCreated(entity) => tracer.entity_created(*entity, Some(plugin)),
            WorldChange::ValueWritten { entity, value } => {
                tracer.value_written(*entity, value, Some(plugin));
            }
            WorldChange::FactAsserted { predicate } => tracer.fact_asserted(predicate, Some(plugin)),
            WorldChange::FactsRetracted { predicate, count } => {
                tracer.record(TraceEvent::FactsRetracted {
                    predicate: predicate.clone(),
                    count: *count,
                    plugin: plugin.to_string(),
                });
            }
            WorldChange::RefreshRequested => {}
        }
    }
}
