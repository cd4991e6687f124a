use std::collections::HashMap;
use std::path::Path;

use super::model::DiphoneError;

/// File names searched for when no lexicon path is given.
pub const LEXICON_FILE_NAMES: &[&str] = &["cmudict.dict", "cmudict-0.7b", "cmudict.txt", "cmudict"];

/// A pronunciation source: word → phone label sequences.
///
/// Words are looked up in lower case. Pronunciations come back in
/// preference order; callers use the first one.
pub trait Lexicon {
    fn lookup(&self, word: &str) -> Option<&[Vec<String>]>;
}

impl Lexicon for HashMap<String, Vec<Vec<String>>> {
    fn lookup(&self, word: &str) -> Option<&[Vec<String>]> {
        self.get(word).map(Vec::as_slice)
    }
}

/// The CMU Pronouncing Dictionary.
///
/// Accepts both the classic upper-case `cmudict-0.7b` layout and the newer
/// lower-case `cmudict.dict` layout:
///
/// ```text
/// ;;; comment
/// TOMATO  T AH0 M EY1 T OW2
/// TOMATO(2)  T AH0 M AA1 T OW2
/// ```
#[derive(Debug, Default)]
pub struct CmuDict {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl CmuDict {
    /// Load a dictionary file. Bytes that are not valid UTF-8 are replaced.
    pub fn load(path: &Path) -> Result<Self, DiphoneError> {
        let bytes = std::fs::read(path)?;
        let dict = Self::parse(&String::from_utf8_lossy(&bytes));
        log::info!("Loaded {} lexicon entries from {}", dict.len(), path.display());
        Ok(dict)
    }

    pub fn parse(content: &str) -> Self {
        let mut entries: HashMap<String, Vec<Vec<String>>> = HashMap::new();

        for line in content.lines() {
            // `#HASH-MARK` is a real headword, so only ` #` opens a comment.
            let line = match line.find(" #") {
                Some(idx) => &line[..idx],
                None => line,
            }
            .trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(head) = fields.next() else {
                continue;
            };
            let phones: Vec<String> = fields.map(str::to_string).collect();
            if phones.is_empty() {
                log::debug!("Skipping lexicon entry without phones: {head:?}");
                continue;
            }

            entries
                .entry(strip_variant(head).to_lowercase())
                .or_default()
                .push(phones);
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lexicon for CmuDict {
    fn lookup(&self, word: &str) -> Option<&[Vec<String>]> {
        self.entries.get(word).map(Vec::as_slice)
    }
}

/// `WORD(2)` → `WORD`
fn strip_variant(head: &str) -> &str {
    match head.strip_suffix(')').and_then(|h| h.rsplit_once('(')) {
        Some((word, n)) if !word.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => word,
        _ => head,
    }
}

/// Remove stress digits from a phone label (`AH0` → `AH`).
pub fn strip_stress(label: &str) -> String {
    label.chars().filter(|c| !c.is_ascii_digit()).collect()
}
