//! Trace event and record types.
//!
//! One processing cycle produces a `cycle-start` record, the parse outcome,
//! one record per dispatch attempt and per world change, and a `cycle-end`.

use parley_foundation::{EntityId, Mood};

// =============================================================================
// Trace Event
// =============================================================================

/// Events that can be traced while a processor runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// A cycle has started.
    CycleStart {
        /// The cycle number.
        cycle: u64,
        /// The raw input.
        input: String,
    },

    /// A cycle has ended.
    CycleEnd {
        /// The cycle number.
        cycle: u64,
        /// Number of events that failed.
        failures: usize,
        /// Whether the world changed.
        mutated: bool,
    },

    /// The engine parsed the input.
    Parsed {
        /// The mood of the utterance.
        mood: Mood,
        /// Number of events produced.
        events: usize,
    },

    /// The parse was discarded because its mood is disabled.
    MoodRejected {
        /// The rejected mood.
        mood: Mood,
    },

    /// The engine could not parse the input.
    ParseFailed {
        /// Why.
        message: String,
    },

    /// An event was handed to a plugin.
    Dispatched {
        /// The event predicate.
        predicate: String,
        /// The plugin chosen.
        plugin: String,
        /// Number of keywords the chosen entry required.
        specificity: usize,
    },

    /// No plugin could take an event.
    DispatchFailed {
        /// The event predicate.
        predicate: String,
        /// The failure message.
        message: String,
    },

    /// A handler rejected an event.
    HandlerFailed {
        /// The event predicate.
        predicate: String,
        /// The plugin whose handler failed.
        plugin: String,
        /// The failure message.
        message: String,
    },

    /// An entity was allocated.
    EntityCreated {
        /// The new entity.
        entity: EntityId,
        /// The plugin that allocated it, if any.
        plugin: Option<String>,
    },

    /// An entity's string value changed.
    ValueWritten {
        /// The entity written.
        entity: EntityId,
        /// The new value.
        value: String,
        /// The plugin that wrote it, if any.
        plugin: Option<String>,
    },

    /// A fact was asserted.
    FactAsserted {
        /// The fact predicate.
        predicate: String,
        /// The plugin that asserted it, if any.
        plugin: Option<String>,
    },

    /// Facts were retracted.
    FactsRetracted {
        /// Their predicate.
        predicate: String,
        /// How many.
        count: usize,
        /// The plugin that retracted them.
        plugin: String,
    },

    /// The world model description was regenerated.
    DescriptionRefreshed {
        /// Number of events in the new description.
        events: usize,
    },

    /// Setup finished and the grammar was compiled.
    SetupFinished {
        /// Number of registered plugins.
        plugins: usize,
        /// Number of signature symbols.
        symbols: usize,
        /// Number of lexicon entries.
        words: usize,
    },
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CycleStart { .. } => "cycle-start",
            Self::CycleEnd { .. } => "cycle-end",
            Self::Parsed { .. } => "parsed",
            Self::MoodRejected { .. } => "mood-rejected",
            Self::ParseFailed { .. } => "parse-failed",
            Self::Dispatched { .. } => "dispatched",
            Self::DispatchFailed { .. } => "dispatch-failed",
            Self::HandlerFailed { .. } => "handler-failed",
            Self::EntityCreated { .. } => "entity-created",
            Self::ValueWritten { .. } => "value-written",
            Self::FactAsserted { .. } => "fact-asserted",
            Self::FactsRetracted { .. } => "facts-retracted",
            Self::DescriptionRefreshed { .. } => "description-refreshed",
            Self::SetupFinished { .. } => "setup-finished",
        }
    }

    /// Returns true if this is a cycle boundary event.
    #[must_use]
    pub fn is_cycle_boundary(&self) -> bool {
        matches!(self, Self::CycleStart { .. } | Self::CycleEnd { .. })
    }

    /// Returns true if this event reports a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::MoodRejected { .. }
                | Self::ParseFailed { .. }
                | Self::DispatchFailed { .. }
                | Self::HandlerFailed { .. }
        )
    }

    /// Returns true if this event records a world change.
    #[must_use]
    pub fn is_world_change(&self) -> bool {
        matches!(
            self,
            Self::EntityCreated { .. }
                | Self::ValueWritten { .. }
                | Self::FactAsserted { .. }
                | Self::FactsRetracted { .. }
        )
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A timestamped trace record.
#[derive(Clone, Debug)]
pub struct TraceRecord {
    /// Unique record ID within the session.
    pub id: u64,
    /// The cycle during which this event occurred (0 during setup).
    pub cycle: u64,
    /// Timestamp in nanoseconds since the tracer was created.
    pub timestamp_ns: u64,
    /// The trace event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(id: u64, cycle: u64, timestamp_ns: u64, event: TraceEvent) -> Self {
        Self {
            id,
            cycle,
            timestamp_ns,
            event,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}
