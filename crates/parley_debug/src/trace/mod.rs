//! Tracing for processing cycles.
//!
//! A [`Tracer`] records what a processor does with each utterance: the
//! parse, every dispatch, and every world change a plugin makes. Recording
//! costs one branch when tracing is disabled.
//!
//! # Example
//!
//! ```text
//! > :trace on
//! > go to docs
//! C0003 === CYCLE 3 START "go to docs" ===
//! C0003   PARSED imperative, 1 event(s)
//! C0003   DISPATCH go -> shell [2]
//! C0003     ASSERT (shell) contains
//! C0003 === CYCLE 3 END (OK, world changed) ===
//! ```

pub mod buffer;
pub mod format;
pub mod record;

pub use buffer::{DEFAULT_BUFFER_SIZE, TraceBuffer, TraceBufferStats};
pub use format::{HumanFormatter, JsonFormatter, TraceFormatter};
pub use record::{TraceEvent, TraceRecord};

use std::io::{self, Write};
use std::time::Instant;

use parley_foundation::{EntityId, Mood};

// =============================================================================
// Tracer Configuration
// =============================================================================

/// Where trace output should be sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceOutput {
    /// No output (records are still buffered).
    #[default]
    None,
    /// Write each record to stderr as it is recorded.
    Stderr,
}

/// Configuration for the tracer.
#[derive(Clone, Debug)]
pub struct TracerConfig {
    /// Whether tracing is enabled.
    pub enabled: bool,
    /// Maximum records to keep in the buffer.
    pub buffer_size: usize,
    /// Where to output traces.
    pub output: TraceOutput,
    /// Whether to use JSON format.
    pub json_format: bool,
    /// Event types to keep (empty keeps all).
    pub event_filter: Vec<String>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            output: TraceOutput::None,
            json_format: false,
            event_filter: Vec::new(),
        }
    }
}

impl TracerConfig {
    /// Creates a disabled configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to enable tracing.
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Builder method to set buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Builder method to output to stderr.
    #[must_use]
    pub fn to_stderr(mut self) -> Self {
        self.output = TraceOutput::Stderr;
        self
    }

    /// Builder method to use JSON format.
    #[must_use]
    pub fn json(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Builder method to keep only the named event types.
    #[must_use]
    pub fn filter_events(mut self, types: Vec<String>) -> Self {
        self.event_filter = types;
        self
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Records trace events for one processor.
pub struct Tracer {
    config: TracerConfig,
    buffer: TraceBuffer,
    current_cycle: u64,
    start_time: Instant,
    human_formatter: HumanFormatter,
    json_formatter: JsonFormatter,
}

impl Tracer {
    /// Creates a tracer with the given configuration.
    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        let buffer_size = config.buffer_size;
        Self {
            config,
            buffer: TraceBuffer::new(buffer_size),
            current_cycle: 0,
            start_time: Instant::now(),
            human_formatter: HumanFormatter::new(),
            json_formatter: JsonFormatter::new(),
        }
    }

    /// Creates a disabled tracer.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(TracerConfig::default())
    }

    /// Returns whether tracing is enabled.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Enables tracing.
    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    /// Disables tracing.
    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// Returns the current cycle number.
    #[must_use]
    pub fn current_cycle(&self) -> u64 {
        self.current_cycle
    }

    /// Sets whether to use JSON output format.
    pub fn set_json_format(&mut self, json: bool) {
        self.config.json_format = json;
    }

    /// Sets the trace output destination.
    pub fn set_output(&mut self, output: TraceOutput) {
        self.config.output = output;
    }

    /// Records a trace event. Returns immediately when disabled.
    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if !self.config.enabled {
            return;
        }
        self.record_internal(event);
    }

    fn record_internal(&mut self, event: TraceEvent) {
        if !self.config.event_filter.is_empty()
            && !self
                .config
                .event_filter
                .iter()
                .any(|t| t == event.event_type())
        {
            return;
        }

        #[allow(clippy::cast_possible_truncation)]
        let timestamp_ns = self.start_time.elapsed().as_nanos() as u64;
        self.buffer.push(self.current_cycle, timestamp_ns, event);

        if self.config.output == TraceOutput::Stderr {
            if let Some(record) = self.buffer.last() {
                let line = self.format_record(record);
                let _ = writeln!(io::stderr(), "{line}");
            }
        }
    }

    /// Formats a record using the current format settings.
    #[must_use]
    pub fn format_record(&self, record: &TraceRecord) -> String {
        if self.config.json_format {
            self.json_formatter.format(record)
        } else {
            self.human_formatter.format(record)
        }
    }

    /// Formats several records.
    #[must_use]
    pub fn format_records(&self, records: &[&TraceRecord]) -> String {
        if self.config.json_format {
            self.json_formatter.format_many(records)
        } else {
            self.human_formatter.format_many(records)
        }
    }

    /// Returns the trace buffer.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    /// Clears the trace buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Returns buffer statistics.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        self.buffer.stats()
    }

    // -------------------------------------------------------------------------
    // Convenience methods for common events
    // -------------------------------------------------------------------------

    /// Records a cycle start and makes `cycle` current.
    #[inline]
    pub fn cycle_start(&mut self, cycle: u64, input: &str) {
        self.current_cycle = cycle;
        if self.is_enabled() {
            self.record(TraceEvent::CycleStart {
                cycle,
                input: input.to_string(),
            });
        }
    }

    /// Records a cycle end.
    #[inline]
    pub fn cycle_end(&mut self, cycle: u64, failures: usize, mutated: bool) {
        self.record(TraceEvent::CycleEnd {
            cycle,
            failures,
            mutated,
        });
    }

    /// Records a successful parse.
    #[inline]
    pub fn parsed(&mut self, mood: Mood, events: usize) {
        self.record(TraceEvent::Parsed { mood, events });
    }

    /// Records a dispatch.
    #[inline]
    pub fn dispatched(&mut self, predicate: &str, plugin: &str, specificity: usize) {
        if self.is_enabled() {
            self.record(TraceEvent::Dispatched {
                predicate: predicate.to_string(),
                plugin: plugin.to_string(),
                specificity,
            });
        }
    }

    /// Records an entity allocation.
    #[inline]
    pub fn entity_created(&mut self, entity: EntityId, plugin: Option<&str>) {
        if self.is_enabled() {
            self.record(TraceEvent::EntityCreated {
                entity,
                plugin: plugin.map(str::to_string),
            });
        }
    }

    /// Records a string value write.
    #[inline]
    pub fn value_written(&mut self, entity: EntityId, value: &str, plugin: Option<&str>) {
        if self.is_enabled() {
            self.record(TraceEvent::ValueWritten {
                entity,
                value: value.to_string(),
                plugin: plugin.map(str::to_string),
            });
        }
    }

    /// Records a fact assertion.
    #[inline]
    pub fn fact_asserted(&mut self, predicate: &str, plugin: Option<&str>) {
        if self.is_enabled() {
            self.record(TraceEvent::FactAsserted {
                predicate: predicate.to_string(),
                plugin: plugin.map(str::to_string),
            });
        }
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("config", &self.config)
            .field("records", &self.buffer.len())
            .field("current_cycle", &self.current_cycle)
            .finish_non_exhaustive()
    }
}
