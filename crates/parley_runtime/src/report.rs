//! The result of one processing cycle.

use parley_foundation::{Error, Mood, ProcessorCode};
use parley_plugin::EventSet;

/// What happened to one event of a cycle.
#[derive(Clone, Debug)]
pub struct EventOutcome {
    /// The plugin whose handler ran, if resolution succeeded.
    pub plugin: Option<String>,
    /// The dispatch or handler failure, if any.
    pub error: Option<Error>,
    /// Lines the handler asked to show the user.
    pub messages: Vec<String>,
}

impl EventOutcome {
    /// Returns true if the handler ran and succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The result of processing one input.
///
/// `outcomes[i]` belongs to `events[i]`.
#[derive(Clone, Debug)]
pub struct CycleReport {
    /// The cycle number, starting at 1.
    pub cycle: u64,
    /// Mood of the parsed utterance.
    pub mood: Mood,
    /// The parsed events, in handler execution order.
    pub events: EventSet,
    /// Per-event outcomes.
    pub outcomes: Vec<EventOutcome>,
    /// Rendered output followed by handler messages.
    pub output: String,
    /// Whether the world model changed during the cycle.
    pub mutated: bool,
}

impl CycleReport {
    /// Returns true if every event succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(EventOutcome::is_success)
    }

    /// Returns true if some events failed and others succeeded.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        let failed = self.failures().count();
        failed > 0 && failed < self.outcomes.len()
    }

    /// Failed events as `(index, error)`.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.error.as_ref().map(|e| (i, e)))
    }

    /// `Success`, or the code of the first failure.
    #[must_use]
    pub fn code(&self) -> ProcessorCode {
        self.failures()
            .find_map(|(_, e)| e.code())
            .unwrap_or(ProcessorCode::Success)
    }
}
