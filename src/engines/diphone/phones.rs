//! Token → phone expansion and phone → diphone sequencing.

use std::fmt;

use super::config::ReverseMode;
use super::lexicon::{strip_stress, Lexicon};
use super::text::{Mark, Token};

/// Label used for silence in diphone names (`pau-k`, `t-pau`).
pub const SILENCE_LABEL: &str = "pau";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phone {
    /// A speech sound, stress digits already removed.
    Sound(String),
    Silence,
    Mark(Mark),
}

impl Phone {
    pub fn label(&self) -> &str {
        match self {
            Phone::Sound(label) => label,
            Phone::Silence => SILENCE_LABEL,
            Phone::Mark(mark) => mark.symbol(),
        }
    }

    fn mark(&self) -> Option<Mark> {
        match self {
            Phone::Mark(mark) => Some(*mark),
            _ => None,
        }
    }

    fn mirrored(self) -> Self {
        match self {
            Phone::Mark(mark) => Phone::Mark(mark.mirrored()),
            phone => phone,
        }
    }
}

/// Phones for one phrase, plus the words the lexicon could not resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub phones: Vec<Phone>,
    pub unknown_words: Vec<String>,
}

/// Expand tokens into phones.
///
/// Words take their first pronunciation; unknown words are collected in
/// [`Expansion::unknown_words`] and contribute nothing. Pause marks are
/// wrapped in silence and emphasis marks pass through. The result always
/// starts and ends with a single [`Phone::Silence`].
pub fn expand(tokens: &[Token], lexicon: &dyn Lexicon, reverse: ReverseMode) -> Expansion {
    let mut phones = vec![Phone::Silence];
    let mut unknown_words = Vec::new();

    for token in tokens {
        match token {
            Token::Word(word) => match lexicon.lookup(word).and_then(|prons| prons.first()) {
                Some(pron) => {
                    phones.extend(pron.iter().map(|label| Phone::Sound(strip_stress(label))));
                }
                None => unknown_words.push(word.clone()),
            },
            Token::Mark(mark @ (Mark::Comma | Mark::Period)) => {
                phones.extend([Phone::Silence, Phone::Mark(*mark), Phone::Silence]);
            }
            Token::Mark(mark) => phones.push(Phone::Mark(*mark)),
        }
    }

    if phones.last() != Some(&Phone::Silence) {
        phones.push(Phone::Silence);
    }

    if reverse == ReverseMode::Phones {
        phones = reverse_phones(phones);
    }

    Expansion {
        phones,
        unknown_words,
    }
}

/// Reverse the phone order, swapping emphasis markers in the same pass.
pub fn reverse_phones(phones: Vec<Phone>) -> Vec<Phone> {
    phones.into_iter().rev().map(Phone::mirrored).collect()
}

/// One step of the concatenation plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diphone {
    /// Transition between two phones, named `a-b`.
    Unit(String),
    /// A pause or emphasis instruction; carries no audio of its own.
    Mark(Mark),
}

impl Diphone {
    fn between(a: &Phone, b: &Phone) -> Self {
        Diphone::Unit(format!("{}-{}", a.label(), b.label()))
    }
}

impl fmt::Display for Diphone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diphone::Unit(key) => f.write_str(key),
            Diphone::Mark(mark) => f.write_str(mark.symbol()),
        }
    }
}

/// Pair neighbouring phones into diphones.
///
/// Marks pass through on their own. A sound followed by an emphasis marker
/// is joined to the phone after the marker, so emphasis never interrupts a
/// transition; at the very end of the sequence there is nothing to join to
/// and the position is dropped.
pub fn diphones(phones: &[Phone]) -> Vec<Diphone> {
    let mut sequence = Vec::with_capacity(phones.len().saturating_sub(1));

    for (i, pair) in phones.windows(2).enumerate() {
        let (a, b) = (&pair[0], &pair[1]);
        match (a.mark(), b.mark()) {
            (Some(mark), _) => sequence.push(Diphone::Mark(mark)),
            (None, None) => sequence.push(Diphone::between(a, b)),
            (None, Some(mark)) if mark.is_emphasis() => {
                // `next` may itself be a marker (`{}`), giving a key like `ah-}`
                // that no voice records; it is reported as missing downstream.
                if let Some(next) = phones.get(i + 2) {
                    sequence.push(Diphone::between(a, next));
                }
            }
            // the pause mark itself is emitted on the next step
            (None, Some(_)) => {}
        }
    }

    sequence
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::engines::diphone::text::normalize;

    fn lexicon() -> HashMap<String, Vec<Vec<String>>> {
        let entries: &[(&str, &[&[&str]])] = &[
            ("cat", &[&["K", "AE1", "T"]]),
            ("a", &[&["AH0"], &["EY1"]]),
            ("b", &[&["B", "IY1"]]),
            ("c", &[&["S", "IY1"]]),
        ];
        entries
            .iter()
            .map(|(word, prons)| {
                let prons = prons
                    .iter()
                    .map(|p| p.iter().map(|s| s.to_string()).collect())
                    .collect();
                (word.to_string(), prons)
            })
            .collect()
    }

    fn sound(label: &str) -> Phone {
        Phone::Sound(label.to_string())
    }

    fn unit(key: &str) -> Diphone {
        Diphone::Unit(key.to_string())
    }

    fn phones_for(text: &str, reverse: ReverseMode) -> Expansion {
        let tokens = normalize(text, false, reverse);
        expand(&tokens, &lexicon(), reverse)
    }

    #[test]
    fn expands_cat_with_period() {
        let expansion = phones_for("cat.", ReverseMode::None);
        assert_eq!(
            expansion.phones,
            vec![
                Phone::Silence,
                sound("K"),
                sound("AE"),
                sound("T"),
                Phone::Silence,
                Phone::Mark(Mark::Period),
                Phone::Silence,
            ]
        );
        assert_eq!(
            diphones(&expansion.phones),
            vec![
                unit("pau-K"),
                unit("K-AE"),
                unit("AE-T"),
                unit("T-pau"),
                Diphone::Mark(Mark::Period),
            ]
        );
    }

    #[test]
    fn uses_first_pronunciation_only() {
        let expansion = phones_for("a", ReverseMode::None);
        assert_eq!(
            expansion.phones,
            vec![Phone::Silence, sound("AH"), Phone::Silence]
        );
    }

    #[test]
    fn unknown_words_are_reported_and_skipped() {
        let expansion = phones_for("cat zyzzyva", ReverseMode::None);
        assert_eq!(expansion.unknown_words, vec!["zyzzyva".to_string()]);
        assert_eq!(expansion.phones.len(), 5);
    }

    #[test]
    fn never_ends_with_doubled_silence() {
        for text in ["cat", "cat.", "cat,", "cat, a.", "", "{cat}", "cat!"] {
            let phones = phones_for(text, ReverseMode::None).phones;
            assert_eq!(phones.first(), Some(&Phone::Silence), "{text:?}");
            assert_eq!(phones.last(), Some(&Phone::Silence), "{text:?}");
            if phones.len() > 1 {
                assert_ne!(phones[phones.len() - 2], Phone::Silence, "{text:?}");
            }
        }
    }

    #[test]
    fn phone_reversal_swaps_emphasis_markers() {
        let expansion = phones_for("a {b} c", ReverseMode::Phones);
        assert_eq!(
            expansion.phones,
            vec![
                Phone::Silence,
                sound("IY"),
                sound("S"),
                Phone::Mark(Mark::EmphasisOpen),
                sound("IY"),
                sound("B"),
                Phone::Mark(Mark::EmphasisClose),
                sound("AH"),
                Phone::Silence,
            ]
        );
    }

    #[test]
    fn diphone_count_is_one_less_than_phone_count() {
        let phones = vec![Phone::Silence, sound("K"), sound("AE"), sound("T"), Phone::Silence];
        assert_eq!(diphones(&phones).len(), phones.len() - 1);
    }

    #[test]
    fn bridges_transitions_across_emphasis() {
        let phones = phones_for("a {b} c", ReverseMode::None).phones;
        assert_eq!(
            diphones(&phones),
            vec![
                unit("pau-AH"),
                unit("AH-B"),
                Diphone::Mark(Mark::EmphasisOpen),
                unit("B-IY"),
                unit("IY-S"),
                Diphone::Mark(Mark::EmphasisClose),
                unit("S-IY"),
                unit("IY-pau"),
            ]
        );
    }

    #[test]
    fn drops_bridge_with_nothing_after_marker() {
        let phones = vec![Phone::Silence, sound("AH"), Phone::Mark(Mark::EmphasisClose)];
        assert_eq!(diphones(&phones), vec![unit("pau-AH")]);
    }

    #[test]
    fn empty_emphasis_span_bridges_onto_closing_marker() {
        let phones = phones_for("a{}b", ReverseMode::None).phones;
        assert_eq!(
            diphones(&phones),
            vec![
                unit("pau-AH"),
                unit("AH-}"),
                Diphone::Mark(Mark::EmphasisOpen),
                Diphone::Mark(Mark::EmphasisClose),
                unit("B-IY"),
                unit("IY-pau"),
            ]
        );
    }

    #[test]
    fn comma_yields_single_pause_step() {
        let phones = phones_for("a, b", ReverseMode::None).phones;
        let steps = diphones(&phones);
        assert_eq!(
            steps,
            vec![
                unit("pau-AH"),
                unit("AH-pau"),
                Diphone::Mark(Mark::Comma),
                unit("pau-B"),
                unit("B-IY"),
                unit("IY-pau"),
            ]
        );
    }

    #[test]
    fn displays_marks_as_symbols() {
        assert_eq!(Diphone::Mark(Mark::Comma).to_string(), ",");
        assert_eq!(unit("k-ae").to_string(), "k-ae");
    }
}
