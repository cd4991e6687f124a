//! Text normalization: raw phrase → word and marker tokens.

use super::config::ReverseMode;

/// Non-word units that survive normalization and steer later stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Short pause.
    Comma,
    /// Long pause; also stands in for `:`, `?` and `!`.
    Period,
    /// Start of an emphasized span (`{`).
    EmphasisOpen,
    /// End of an emphasized span (`}`).
    EmphasisClose,
}

impl Mark {
    /// The opposite emphasis marker; pause marks map to themselves.
    ///
    /// Applying this once to every element of a reversed sequence keeps
    /// each emphasized span covering the same words.
    pub fn mirrored(self) -> Self {
        match self {
            Mark::EmphasisOpen => Mark::EmphasisClose,
            Mark::EmphasisClose => Mark::EmphasisOpen,
            other => other,
        }
    }

    pub fn is_emphasis(self) -> bool {
        matches!(self, Mark::EmphasisOpen | Mark::EmphasisClose)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Mark::Comma => ",",
            Mark::Period => ".",
            Mark::EmphasisOpen => "{",
            Mark::EmphasisClose => "}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Mark(Mark),
}

impl Token {
    fn mirrored(self) -> Self {
        match self {
            Token::Mark(mark) => Token::Mark(mark.mirrored()),
            word => word,
        }
    }
}

/// Turn a raw phrase into tokens.
///
/// The phrase is lower-cased; `,` `.` `{` `}` become marker tokens, `:` `?`
/// `!` are treated as `.`, apostrophes stay inside words and every other
/// non-word character separates words. With `spell` set each word is
/// replaced by its letters. [`ReverseMode::Words`] reverses the token order.
pub fn normalize(phrase: &str, spell: bool, reverse: ReverseMode) -> Vec<Token> {
    let lower = phrase.to_lowercase();
    let mut tokens = split_tokens(&lower);

    if spell {
        tokens = spell_out(tokens);
    }

    if reverse == ReverseMode::Words {
        tokens = reverse_tokens(tokens);
    }

    tokens
}

fn split_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if let Some(mark) = map_mark(ch) {
            flush_word(&mut tokens, &mut current);
            tokens.push(Token::Mark(mark));
        } else if is_word_char(ch) {
            current.push(ch);
        } else {
            flush_word(&mut tokens, &mut current);
        }
    }

    flush_word(&mut tokens, &mut current);
    tokens
}

fn flush_word(tokens: &mut Vec<Token>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(Token::Word(std::mem::take(current)));
    }
}

fn map_mark(ch: char) -> Option<Mark> {
    match ch {
        ',' => Some(Mark::Comma),
        '.' | ':' | '?' | '!' => Some(Mark::Period),
        '{' => Some(Mark::EmphasisOpen),
        '}' => Some(Mark::EmphasisClose),
        _ => None,
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '\''
}

fn spell_out(tokens: Vec<Token>) -> Vec<Token> {
    let mut letters = Vec::with_capacity(tokens.len() * 4);
    for token in tokens {
        match token {
            Token::Word(word) => letters.extend(
                word.chars()
                    .filter(|c| c.is_alphabetic())
                    .map(|c| Token::Word(c.to_string())),
            ),
            mark => letters.push(mark),
        }
    }
    letters
}

/// Reverse the token order, swapping emphasis markers in the same pass.
pub fn reverse_tokens(tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().rev().map(Token::mirrored).collect()
}

/// Split a document into phrases in reading order.
///
/// Lines are accumulated until one contains a terminal mark (`.` `!` `?`
/// `:`); everything up to and including the last such mark on that line
/// closes the current phrase and the rest of the line starts the next one.
/// Text left over at the end becomes a final phrase. Blank phrases are
/// dropped.
pub fn split_phrases(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut pending = String::new();

    for line in text.split_inclusive('\n') {
        match line.rfind(['.', '!', '?', ':']) {
            Some(idx) => {
                pending.push_str(&line[..=idx]);
                push_phrase(&mut phrases, std::mem::take(&mut pending));
                pending.push_str(&line[idx + 1..]);
            }
            None => pending.push_str(line),
        }
    }

    push_phrase(&mut phrases, pending);
    phrases
}

fn push_phrase(phrases: &mut Vec<String>, phrase: String) {
    if !phrase.trim().is_empty() {
        phrases.push(phrase);
    }
}
