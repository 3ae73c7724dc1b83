//! Integration tests for the error taxonomy
//!
//! Every failure must be distinguishable by category and, where one exists,
//! by flat status code.

use parley_foundation::{
    EntityId, Error, ErrorCategory, ErrorKind, LifecycleViolation, ModelId, Mood, ProcessorCode,
};

#[test]
fn mood_rejection_per_mood() {
    let codes: Vec<_> = Mood::ALL
        .iter()
        .map(|&m| Error::mood_rejected(m).code())
        .collect();
    assert_eq!(
        codes,
        [
            Some(ProcessorCode::NoIndicatives),
            Some(ProcessorCode::NoImperatives),
            Some(ProcessorCode::NoInterrogatives),
        ]
    );
    assert!(
        Mood::ALL
            .iter()
            .all(|&m| Error::mood_rejected(m).category() == ErrorCategory::MoodRejected)
    );
}

#[test]
fn categories_are_distinct() {
    let errors = [
        Error::mood_rejected(Mood::Imperative),
        Error::invalid_input("xyzzy", "unknown word"),
        Error::cannot_dispatch("go", None),
        Error::invalid_event("go", "no such directory"),
        Error::setup_conflict("directory", "predicate vs property"),
        Error::lifecycle(LifecycleViolation::Poisoned),
    ];
    let categories: Vec<_> = errors.iter().map(Error::category).collect();
    assert_eq!(
        categories,
        [
            ErrorCategory::MoodRejected,
            ErrorCategory::UnparseableInput,
            ErrorCategory::DispatchFailure,
            ErrorCategory::InvalidEvent,
            ErrorCategory::SetupConflict,
            ErrorCategory::LifecycleViolation,
        ]
    );
}

#[test]
fn only_setup_and_lifecycle_errors_are_fatal() {
    assert!(Error::setup_conflict("go", "twice").is_fatal());
    assert!(Error::lifecycle(LifecycleViolation::AlreadySetUp).is_fatal());
    assert!(!Error::invalid_event("go", "nope").is_fatal());
    assert!(!Error::cannot_dispatch("go", Some("shell".into())).is_fatal());
    assert!(!Error::new(ErrorKind::IoError("disk".into())).is_fatal());
}

#[test]
fn supporting_kinds_have_no_code() {
    let e = EntityId::new(ModelId::fresh(), 4);
    assert_eq!(Error::foreign_entity(e).code(), None);
    assert_eq!(Error::unknown_entity(e).category(), ErrorCategory::Other);
    assert_eq!(Error::undeclared_predicate("sparkles").code(), None);
}

#[test]
fn messages_name_the_problem() {
    let message = Error::cannot_dispatch("go", Some("shell".into())).to_string();
    assert!(message.contains("go"));
    assert!(message.contains("shell"));
    assert!(Error::invalid_input("xyzzy", "unknown word").to_string().contains("xyzzy"));
}
