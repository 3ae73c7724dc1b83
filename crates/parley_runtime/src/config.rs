//! Processor configuration.

use parley_debug::{ObservabilityConfig, TracerConfig};
use parley_foundation::Mood;

/// Settings a processor is built with.
///
/// Every mood is accepted and tracing is off by default.
#[derive(Clone, Debug)]
pub struct ProcessorConfig {
    /// Whether indicative input is processed.
    pub accept_indicatives: bool,
    /// Whether imperative input is processed.
    pub accept_imperatives: bool,
    /// Whether interrogative input is processed.
    pub accept_interrogatives: bool,
    /// Tracer settings.
    pub tracer: TracerConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            accept_indicatives: true,
            accept_imperatives: true,
            accept_interrogatives: true,
            tracer: TracerConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for indicative acceptance.
    #[must_use]
    pub fn with_indicatives(mut self, accept: bool) -> Self {
        self.accept_indicatives = accept;
        self
    }

    /// Builder method for imperative acceptance.
    #[must_use]
    pub fn with_imperatives(mut self, accept: bool) -> Self {
        self.accept_imperatives = accept;
        self
    }

    /// Builder method for interrogative acceptance.
    #[must_use]
    pub fn with_interrogatives(mut self, accept: bool) -> Self {
        self.accept_interrogatives = accept;
        self
    }

    /// Builder method for tracer settings.
    #[must_use]
    pub fn with_tracer(mut self, tracer: TracerConfig) -> Self {
        self.tracer = tracer;
        self
    }

    /// Builder method taking tracer settings from an observability preset.
    #[must_use]
    pub fn with_observability(self, observability: &ObservabilityConfig) -> Self {
        self.with_tracer(observability.tracer_config())
    }

    /// Returns true if input in `mood` is processed.
    #[must_use]
    pub fn accepts(&self, mood: Mood) -> bool {
        match mood {
            Mood::Indicative => self.accept_indicatives,
            Mood::Imperative => self.accept_imperatives,
            Mood::Interrogative => self.accept_interrogatives,
        }
    }

    pub(crate) fn set_accepts(&mut self, mood: Mood, accept: bool) {
        match mood {
            Mood::Indicative => self.accept_indicatives = accept,
            Mood::Imperative => self.accept_imperatives = accept,
            Mood::Interrogative => self.accept_interrogatives = accept,
        }
    }
}
