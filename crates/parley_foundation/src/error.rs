//! Error types for the Parley system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. Every
//! error belongs to one [`ErrorCategory`], so callers can tell a rejected mood
//! from a parse failure or a dispatch failure without string matching.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;
use crate::mood::Mood;

/// Result alias used throughout Parley.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Parley operations.
#[derive(Clone, Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates the rejection error for a disabled mood.
    #[must_use]
    pub fn mood_rejected(mood: Mood) -> Self {
        Self::new(match mood {
            Mood::Indicative => ErrorKind::NoIndicatives,
            Mood::Imperative => ErrorKind::NoImperatives,
            Mood::Interrogative => ErrorKind::NoInterrogatives,
        })
    }

    /// Creates an unparseable-input error.
    #[must_use]
    pub fn invalid_input(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput {
            input: input.into(),
            message: message.into(),
        })
    }

    /// Creates a dispatch failure for an event no plugin can handle.
    #[must_use]
    pub fn cannot_dispatch(predicate: impl Into<String>, plugin: Option<String>) -> Self {
        Self::new(ErrorKind::CannotDispatch {
            predicate: predicate.into(),
            plugin,
        })
    }

    /// Creates an invalid-event error raised by a handler.
    #[must_use]
    pub fn invalid_event(predicate: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidEvents {
            predicate: predicate.into(),
            reason: reason.into(),
        })
    }

    /// Creates a setup conflict between plugin declarations.
    #[must_use]
    pub fn setup_conflict(symbol: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::SetupConflict {
            symbol: symbol.into(),
            detail: detail.into(),
        })
    }

    /// Creates a lifecycle violation.
    #[must_use]
    pub fn lifecycle(violation: LifecycleViolation) -> Self {
        Self::new(ErrorKind::Lifecycle(violation))
    }

    /// Creates an undeclared predicate error.
    #[must_use]
    pub fn undeclared_predicate(predicate: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndeclaredPredicate(predicate.into()))
    }

    /// Creates an unknown entity error.
    #[must_use]
    pub fn unknown_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::UnknownEntity(id))
    }

    /// Creates a foreign entity error.
    #[must_use]
    pub fn foreign_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::ForeignEntity(id))
    }

    /// Creates an event notation error.
    #[must_use]
    pub fn notation(message: impl Into<String>, position: usize) -> Self {
        Self::new(ErrorKind::Notation {
            message: message.into(),
            position,
        })
    }

    /// Returns the category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Returns the flat processor status code, if this error has one.
    #[must_use]
    pub fn code(&self) -> Option<ProcessorCode> {
        match &self.kind {
            ErrorKind::NoIndicatives => Some(ProcessorCode::NoIndicatives),
            ErrorKind::NoImperatives => Some(ProcessorCode::NoImperatives),
            ErrorKind::NoInterrogatives => Some(ProcessorCode::NoInterrogatives),
            ErrorKind::InvalidInput { .. } => Some(ProcessorCode::InvalidInput),
            ErrorKind::CannotDispatch { .. } => Some(ProcessorCode::CannotDispatch),
            ErrorKind::InvalidEvents { .. } => Some(ProcessorCode::InvalidEvents),
            _ => None,
        }
    }

    /// Returns true if this error leaves the processor unusable.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::SetupConflict | ErrorCategory::LifecycleViolation
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Clone, Debug, Error)]
pub enum ErrorKind {
    /// Indicative input arrived while indicatives are disabled.
    #[error("indicative input is not accepted")]
    NoIndicatives,

    /// Imperative input arrived while imperatives are disabled.
    #[error("imperative input is not accepted")]
    NoImperatives,

    /// Interrogative input arrived while interrogatives are disabled.
    #[error("interrogative input is not accepted")]
    NoInterrogatives,

    /// The language engine could not produce an event set.
    #[error("could not understand {input:?}: {message}")]
    InvalidInput {
        /// The rejected input text.
        input: String,
        /// Why the engine rejected it.
        message: String,
    },

    /// No plugin dispatch entry satisfies an event.
    #[error("no handler for {predicate}{}", dispatch_scope(.plugin))]
    CannotDispatch {
        /// The event's predicate.
        predicate: String,
        /// The plugin the event designated, if any.
        plugin: Option<String>,
    },

    /// A handler could not execute with its resolved arguments.
    #[error("invalid event {predicate}: {reason}")]
    InvalidEvents {
        /// The event's predicate.
        predicate: String,
        /// Why the handler refused it.
        reason: String,
    },

    /// Two plugin declarations are incompatible.
    #[error("conflicting declarations for {symbol}: {detail}")]
    SetupConflict {
        /// The predicate, relation, or word form in conflict.
        symbol: String,
        /// Description of the conflict.
        detail: String,
    },

    /// An operation was attempted out of lifecycle order.
    #[error("lifecycle violation: {0}")]
    Lifecycle(LifecycleViolation),

    /// A predicate was asserted that no plugin declared.
    #[error("undeclared predicate: {0}")]
    UndeclaredPredicate(String),

    /// Entity handle does not name a live slot.
    #[error("unknown entity: {0:?}")]
    UnknownEntity(EntityId),

    /// Entity handle belongs to a different world model.
    #[error("entity {0:?} belongs to another world model")]
    ForeignEntity(EntityId),

    /// Two plugins share a name.
    #[error("duplicate plugin name: {0}")]
    DuplicatePlugin(String),

    /// Malformed event notation.
    #[error("notation error at {position}: {message}")]
    Notation {
        /// Description of the problem.
        message: String,
        /// Byte offset into the notation text.
        position: usize,
    },

    /// Snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// File system error.
    #[error("io error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

#[allow(clippy::ref_option)]
fn dispatch_scope(plugin: &Option<String>) -> String {
    plugin
        .as_deref()
        .map(|p| format!(" in plugin {p}"))
        .unwrap_or_default()
}

impl ErrorKind {
    /// Returns the category this kind belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoIndicatives | Self::NoImperatives | Self::NoInterrogatives => {
                ErrorCategory::MoodRejected
            }
            Self::InvalidInput { .. } => ErrorCategory::UnparseableInput,
            Self::CannotDispatch { .. } => ErrorCategory::DispatchFailure,
            Self::InvalidEvents { .. } => ErrorCategory::InvalidEvent,
            Self::SetupConflict { .. } => ErrorCategory::SetupConflict,
            Self::Lifecycle(_) => ErrorCategory::LifecycleViolation,
            _ => ErrorCategory::Other,
        }
    }
}

/// The coarse failure classes a caller can assert on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorCategory {
    /// The utterance's mood is disabled.
    MoodRejected,
    /// The engine could not parse the input.
    UnparseableInput,
    /// No dispatch entry satisfied an event.
    DispatchFailure,
    /// A handler rejected its arguments.
    InvalidEvent,
    /// Plugin declarations conflict.
    SetupConflict,
    /// Lifecycle order was violated.
    LifecycleViolation,
    /// Anything else (storage, notation, io).
    Other,
}

/// Flat status codes reported for a processing cycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ProcessorCode {
    /// The cycle completed without failures.
    Success,
    /// Indicatives are disabled.
    NoIndicatives,
    /// Imperatives are disabled.
    NoImperatives,
    /// Interrogatives are disabled.
    NoInterrogatives,
    /// An event could not be dispatched.
    CannotDispatch,
    /// A handler rejected an event.
    InvalidEvents,
    /// The input could not be parsed.
    InvalidInput,
}

/// The ways lifecycle order can be violated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LifecycleViolation {
    /// `start` was called on a running engine.
    EngineAlreadyStarted,
    /// The engine is not running.
    EngineNotRunning,
    /// `stop` was called while processors still hold leases.
    ProcessorsLive(usize),
    /// The operation is not valid in the processor's current state.
    WrongState {
        /// The attempted operation.
        operation: &'static str,
        /// The processor state at the time.
        state: &'static str,
    },
    /// `finish_setup` was called a second time.
    AlreadySetUp,
    /// The processor has been stopped.
    Stopped,
    /// An earlier fatal error left the processor unusable.
    Poisoned,
}

impl fmt::Display for LifecycleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineAlreadyStarted => write!(f, "engine already started"),
            Self::EngineNotRunning => write!(f, "engine is not running"),
            Self::ProcessorsLive(count) => {
                write!(f, "cannot stop engine with {count} live processor(s)")
            }
            Self::WrongState { operation, state } => {
                write!(f, "cannot {operation} while {state}")
            }
            Self::AlreadySetUp => write!(f, "setup already finished"),
            Self::Stopped => write!(f, "processor is stopped"),
            Self::Poisoned => write!(f, "processor is unusable after a fatal error"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Clone, Debug, Default)]
pub struct ErrorContext {
    /// Plugin or component that raised the error.
    pub source: Option<String>,
    /// Processing cycle number.
    pub cycle: Option<u64>,
    /// Chain of plugins and handlers involved.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the processing cycle.
    #[must_use]
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            if let Some(cycle) = self.cycle {
                write!(f, " (cycle {cycle})")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
