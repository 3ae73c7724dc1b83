//! English inflection for automatically added words.
//!
//! Covers the regular spelling rules plus a table of common irregular
//! verbs and nouns. Anything else should be declared with explicit forms.

use crate::declaration::VerbForms;

/// (bare, past, past participle)
const IRREGULAR_VERBS: &[(&str, &str, &str)] = &[
    ("be", "was", "been"),
    ("break", "broke", "broken"),
    ("bring", "brought", "brought"),
    ("come", "came", "come"),
    ("cut", "cut", "cut"),
    ("do", "did", "done"),
    ("eat", "ate", "eaten"),
    ("find", "found", "found"),
    ("get", "got", "gotten"),
    ("give", "gave", "given"),
    ("go", "went", "gone"),
    ("have", "had", "had"),
    ("leave", "left", "left"),
    ("make", "made", "made"),
    ("put", "put", "put"),
    ("read", "read", "read"),
    ("run", "ran", "run"),
    ("say", "said", "said"),
    ("see", "saw", "seen"),
    ("send", "sent", "sent"),
    ("set", "set", "set"),
    ("show", "showed", "shown"),
    ("take", "took", "taken"),
    ("tell", "told", "told"),
    ("throw", "threw", "thrown"),
    ("write", "wrote", "written"),
];

const IRREGULAR_PRESENT: &[(&str, &str)] = &[("be", "is"), ("have", "has")];

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("man", "men"),
    ("mouse", "mice"),
    ("person", "people"),
    ("woman", "women"),
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn ends_with_consonant_y(word: &str) -> bool {
    let mut rev = word.chars().rev();
    matches!((rev.next(), rev.next()), (Some('y'), Some(c)) if !is_vowel(c))
}

fn sibilant(word: &str) -> bool {
    ["s", "x", "z", "ch", "sh"].iter().any(|end| word.ends_with(end))
}

/// Single-syllable consonant-vowel-consonant words double the final letter
/// before a vowel suffix ("stop" -> "stopped").
fn doubles_final(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 3 || chars.iter().filter(|c| is_vowel(**c)).count() != 1 {
        return false;
    }
    let [a, b, c] = [chars[chars.len() - 3], chars[chars.len() - 2], chars[chars.len() - 1]];
    !is_vowel(a) && is_vowel(b) && !is_vowel(c) && !matches!(c, 'w' | 'x' | 'y')
}

fn with_s(word: &str) -> String {
    if ends_with_consonant_y(word) {
        format!("{}ies", &word[..word.len() - 1])
    } else if sibilant(word) || word.ends_with('o') {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}

fn with_ed(word: &str) -> String {
    if ends_with_consonant_y(word) {
        format!("{}ied", &word[..word.len() - 1])
    } else if word.ends_with('e') {
        format!("{word}d")
    } else if doubles_final(word) {
        let last = &word[word.len() - 1..];
        format!("{word}{last}ed")
    } else {
        format!("{word}ed")
    }
}

fn with_ing(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ie") {
        format!("{stem}ying")
    } else if word.ends_with('e') && !word.ends_with("ee") && word != "be" {
        format!("{}ing", &word[..word.len() - 1])
    } else if doubles_final(word) {
        let last = &word[word.len() - 1..];
        format!("{word}{last}ing")
    } else {
        format!("{word}ing")
    }
}

/// Plural of a count noun.
#[must_use]
pub fn plural(noun: &str) -> String {
    if let Some((_, pl)) = IRREGULAR_PLURALS.iter().find(|(sg, _)| *sg == noun) {
        return (*pl).to_string();
    }
    if noun.ends_with('o') {
        return format!("{noun}s");
    }
    with_s(noun)
}

/// Full paradigm for a verb from its bare form.
#[must_use]
pub fn verb_forms(bare: &str) -> VerbForms {
    let (past, participle) = IRREGULAR_VERBS
        .iter()
        .find(|(b, _, _)| *b == bare)
        .map_or_else(
            || (with_ed(bare), with_ed(bare)),
            |(_, past, participle)| ((*past).to_string(), (*participle).to_string()),
        );
    let present_third = IRREGULAR_PRESENT
        .iter()
        .find(|(b, _)| *b == bare)
        .map_or_else(|| with_s(bare), |(_, p)| (*p).to_string());

    VerbForms {
        bare: bare.to_string(),
        present_third,
        past,
        progressive: with_ing(bare),
        perfect: participle.clone(),
        passive: participle,
    }
}
