//! Input tokenization.
//!
//! Converts a raw utterance into lowercase words, quoted names, and
//! question marks.

/// A token from user input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A lowercase word
    Word(String),
    /// A quoted string (preserved as-is)
    Quoted(String),
    /// A question mark
    Question,
}

impl Token {
    /// The word text, if this is a word.
    #[must_use]
    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Word(w) => Some(w),
            _ => None,
        }
    }
}

/// Tokenizes `input`.
///
/// - Converts words to lowercase
/// - Drops apostrophes, so `don't` reads as `dont`
/// - Strips other punctuation except `?`
/// - Preserves quoted strings as atomic units
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current = String::new();

    let flush = |current: &mut String, tokens: &mut Vec<Token>| {
        if !current.is_empty() {
            tokens.push(Token::Word(current.to_lowercase()));
            current.clear();
        }
    };

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                flush(&mut current, &mut tokens);
                let mut quoted = String::new();
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    quoted.push(c);
                }
                tokens.push(Token::Quoted(quoted));
            }
            '?' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Question);
            }
            '\'' | '\u{2019}' => {}
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            '.' | ',' | '!' | ';' | ':' => flush(&mut current, &mut tokens),
            _ => current.push(ch),
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}
