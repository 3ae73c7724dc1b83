//! Rendering events back into English.

use parley_foundation::EntityId;
use parley_plugin::{Event, EventSet, inflect};
use parley_storage::WorldModel;

use crate::frame::{DEFAULT_OBJECT, DEFAULT_SUBJECT, VerbFrame};
use crate::grammar::Grammar;

/// One sentence per foreground event, joined by spaces.
pub(super) fn render(grammar: &Grammar, events: &EventSet, world: &WorldModel) -> String {
    events
        .foreground()
        .map(|event| sentence(grammar, event, world))
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence(grammar: &Grammar, event: &Event, world: &WorldModel) -> String {
    let sense = grammar.lexicon.verb_sense(event.predicate());
    let fallback;
    let frame = match sense {
        Some(sense) => &sense.frame,
        None => {
            fallback = VerbFrame {
                predicate: event.predicate().to_string(),
                subject: DEFAULT_SUBJECT.to_string(),
                object: DEFAULT_OBJECT.to_string(),
                prepositions: Vec::new(),
            };
            &fallback
        }
    };
    let bare = sense
        .and_then(|s| s.bare.clone())
        .unwrap_or_else(|| event.predicate().to_string());

    let mut words: Vec<String> = Vec::new();
    match event.arguments_for(&frame.subject) {
        Some(subject) => words.push(phrase(subject, world, true)),
        None => words.push("something".to_string()),
    }
    if event.exists() {
        let past = sense
            .and_then(|s| s.past.clone())
            .unwrap_or_else(|| inflect::verb_forms(&bare).past);
        words.push(past);
    } else {
        words.push("did not".to_string());
        words.push(bare);
    }
    let preposition = |keyword: &str| {
        frame
            .preposition_for(keyword)
            .or_else(|| grammar.lexicon.preposition_for(keyword))
    };

    // A direct object no preposition introduces comes straight after the verb.
    let direct = preposition(&frame.object).is_none();
    if direct {
        if let Some(object) = event.arguments_for(&frame.object) {
            words.push(phrase(object, world, false));
        }
    }
    for (keyword, entities) in event.arguments().iter() {
        if keyword == frame.subject || (direct && keyword == frame.object) {
            continue;
        }
        words.push(preposition(keyword).unwrap_or(keyword).to_string());
        words.push(phrase(entities, world, false));
    }

    let mut text = words.join(" ");
    capitalize(&mut text);
    text.push('.');
    text
}

/// `a`, `a and b`, `a, b and c`.
fn phrase(entities: &[EntityId], world: &WorldModel, subject: bool) -> String {
    let names: Vec<String> = entities
        .iter()
        .map(|e| name(*e, world, subject && entities.len() == 1))
        .collect();
    match names.as_slice() {
        [] => "nothing".to_string(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn name(entity: EntityId, world: &WorldModel, subject: bool) -> String {
    if world.is_user(entity) {
        return "you".to_string();
    }
    if world.is_computer(entity) {
        return if subject { "I" } else { "me" }.to_string();
    }
    match world.string_value(entity) {
        Ok(Some(value)) => value.to_string(),
        _ => "something".to_string(),
    }
}

fn capitalize(text: &mut String) {
    if let Some(first) = text.chars().next() {
        let upper: String = first.to_uppercase().collect();
        text.replace_range(..first.len_utf8(), &upper);
    }
}
