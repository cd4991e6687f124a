use std::path::{Path, PathBuf};

use crate::audio::{AudioBuffer, AudioError};
use crate::{Diagnostics, SynthesisResult};

use super::assembler::assemble;
use super::config::SynthConfig;
use super::inventory::DiphoneInventory;
use super::lexicon::{CmuDict, Lexicon, LEXICON_FILE_NAMES};
use super::phones::{diphones, expand};
use super::text::{normalize, split_phrases};

#[derive(thiserror::Error, Debug)]
pub enum DiphoneError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("Diphone directory {0} does not exist")]
    DiphoneDirNotFound(PathBuf),
    #[error("No .wav files found in {0}")]
    EmptyInventory(PathBuf),
    #[error(
        "No pronunciation dictionary found near {0}. Pass a lexicon path or place \
         cmudict.dict next to the diphones."
    )]
    LexiconNotFound(PathBuf),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("Model not loaded. Call load_model() first.")]
    ModelNotLoaded,
}

/// A loaded diphone voice: unit inventory plus pronunciation lexicon.
pub struct DiphoneModel {
    inventory: DiphoneInventory,
    lexicon: Box<dyn Lexicon>,
}

impl DiphoneModel {
    /// Load the diphone units in `diphone_dir` and a CMU dictionary.
    ///
    /// Without an explicit `lexicon_path` the dictionary is looked for in
    /// the diphone directory and then its parent.
    pub fn load(diphone_dir: &Path, lexicon_path: Option<&Path>) -> Result<Self, DiphoneError> {
        log::info!("Loading diphones from {}", diphone_dir.display());
        let inventory = DiphoneInventory::load(diphone_dir)?;

        let lexicon_path = match lexicon_path {
            Some(path) => path.to_path_buf(),
            None => find_lexicon(diphone_dir)?,
        };
        let lexicon = CmuDict::load(&lexicon_path)?;

        Ok(Self::new(inventory, lexicon))
    }

    pub fn new(inventory: DiphoneInventory, lexicon: impl Lexicon + 'static) -> Self {
        Self {
            inventory,
            lexicon: Box::new(lexicon),
        }
    }

    pub fn inventory(&self) -> &DiphoneInventory {
        &self.inventory
    }

    /// Synthesize one phrase, without volume adjustment.
    pub fn synthesize_phrase(
        &self,
        phrase: &str,
        config: &SynthConfig,
    ) -> Result<SynthesisResult, DiphoneError> {
        let tokens = normalize(phrase, config.spell, config.reverse);
        let expansion = expand(&tokens, self.lexicon.as_ref(), config.reverse);
        let sequence = diphones(&expansion.phones);

        log::debug!(
            "Phrase {phrase:?}: {} tokens, {} phones, {} diphones",
            tokens.len(),
            expansion.phones.len(),
            sequence.len()
        );
        if !expansion.unknown_words.is_empty() {
            log::warn!(
                "Not in the pronunciation dictionary, skipped: {:?}",
                expansion.unknown_words
            );
        }

        let assembly = assemble(&sequence, &self.inventory, config)?;

        Ok(SynthesisResult {
            audio: assembly.audio,
            diagnostics: Diagnostics {
                unknown_words: expansion.unknown_words,
                missing_diphones: assembly.missing_diphones,
            },
        })
    }

    /// Synthesize `text` as a single phrase.
    pub fn synthesize_text(
        &self,
        text: &str,
        config: &SynthConfig,
    ) -> Result<SynthesisResult, DiphoneError> {
        let mut result = self.synthesize_phrase(text, config)?;
        apply_volume(&mut result.audio, config.volume);
        Ok(result)
    }

    /// Synthesize a multi-sentence document phrase by phrase, in order.
    pub fn synthesize_document(
        &self,
        text: &str,
        config: &SynthConfig,
    ) -> Result<SynthesisResult, DiphoneError> {
        let phrases = split_phrases(text);
        log::info!("Synthesizing {} phrases", phrases.len());

        let mut combined = SynthesisResult {
            audio: AudioBuffer::new(self.inventory.sample_rate()),
            diagnostics: Diagnostics::default(),
        };
        for phrase in &phrases {
            let result = self.synthesize_phrase(phrase, config)?;
            combined.audio.append(result.audio);
            combined.diagnostics.extend(result.diagnostics);
        }

        apply_volume(&mut combined.audio, config.volume);
        Ok(combined)
    }
}

/// Scale to the requested volume; an out-of-range request is logged and the
/// audio left unchanged.
fn apply_volume(audio: &mut AudioBuffer, volume: Option<i32>) {
    let Some(percent) = volume else {
        return;
    };
    match audio.set_volume(percent) {
        Ok(()) => log::debug!("Volume set to {percent}%"),
        Err(e) => log::warn!("{e}; keeping original volume"),
    }
}

fn find_lexicon(diphone_dir: &Path) -> Result<PathBuf, DiphoneError> {
    let candidates = std::iter::once(diphone_dir).chain(diphone_dir.parent());
    for dir in candidates {
        for name in LEXICON_FILE_NAMES {
            let path = dir.join(name);
            if path.is_file() {
                log::info!("Using lexicon {}", path.display());
                return Ok(path);
            }
        }
    }
    Err(DiphoneError::LexiconNotFound(diphone_dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::engines::diphone::config::{ReverseMode, SynthConfigBuilder};

    const RATE: u32 = 16000;

    fn model() -> DiphoneModel {
        let lexicon: HashMap<String, Vec<Vec<String>>> = [
            ("a", vec!["AH0"]),
            ("b", vec!["B", "IY1"]),
            ("c", vec!["S", "IY1"]),
        ]
        .into_iter()
        .map(|(w, p)| (w.to_string(), vec![p.into_iter().map(String::from).collect()]))
        .collect();

        let inventory = DiphoneInventory::from_samples(
            RATE,
            [
                ("pau-ah", vec![10; 2]),
                ("ah-pau", vec![20; 2]),
                ("ah-b", vec![30; 2]),
                ("b-iy", vec![40; 2]),
                ("iy-s", vec![50; 2]),
                ("s-iy", vec![60; 2]),
                ("iy-pau", vec![70; 2]),
                ("pau-b", vec![80; 2]),
            ],
        );
        DiphoneModel::new(inventory, lexicon)
    }

    #[test]
    fn comma_and_period_insert_exact_silence() {
        let result = model().synthesize_text("a, b.", &SynthConfig::default()).unwrap();
        let expected = [
            vec![10; 2],
            vec![20; 2],
            vec![0; 3200],
            vec![80; 2],
            vec![40; 2],
            vec![70; 2],
            vec![0; 6400],
        ]
        .concat();
        assert_eq!(result.audio.samples, expected);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn emphasis_span_is_boosted() {
        let result = model().synthesize_text("a {b} c", &SynthConfig::default()).unwrap();
        let expected = [
            vec![10; 2],
            vec![30; 2],
            vec![80; 2],
            vec![100; 2],
            vec![60; 2],
            vec![70; 2],
        ]
        .concat();
        assert_eq!(result.audio.samples, expected);
    }

    #[test]
    fn reports_unknown_words_and_missing_units() {
        let result = model().synthesize_text("a xylophone c", &SynthConfig::default()).unwrap();
        assert_eq!(result.diagnostics.unknown_words, vec!["xylophone".to_string()]);
        // "a c" with the unknown word dropped needs ah-s, which the voice lacks
        assert_eq!(result.diagnostics.missing_diphones, vec!["ah-s".to_string()]);
        assert_eq!(
            result.audio.samples,
            [vec![10; 2], vec![60; 2], vec![70; 2]].concat()
        );
    }

    #[test]
    fn empty_emphasis_span_reports_marker_key() {
        let result = model().synthesize_text("a{}b", &SynthConfig::default()).unwrap();
        assert_eq!(result.diagnostics.missing_diphones, vec!["ah-}".to_string()]);
        assert_eq!(
            result.audio.samples,
            [vec![10; 2], vec![40; 2], vec![70; 2]].concat()
        );
    }

    #[test]
    fn invalid_volume_leaves_audio_untouched() {
        let plain = model().synthesize_text("a", &SynthConfig::default()).unwrap();
        let config = SynthConfigBuilder::default().volume(150).build().unwrap();
        let loud = model().synthesize_text("a", &config).unwrap();
        assert_eq!(loud.audio, plain.audio);
    }

    #[test]
    fn volume_scales_output() {
        let config = SynthConfigBuilder::default().volume(50).build().unwrap();
        let result = model().synthesize_text("a", &config).unwrap();
        assert_eq!(result.audio.samples, vec![5, 5, 10, 10]);
    }

    #[test]
    fn document_phrases_are_concatenated_in_order() {
        let model = model();
        let config = SynthConfig::default();
        let doc = model.synthesize_document("a.\nb.", &config).unwrap();
        let first = model.synthesize_phrase("a.", &config).unwrap();
        let second = model.synthesize_phrase("b.", &config).unwrap();
        assert_eq!(
            doc.audio.samples,
            [first.audio.samples, second.audio.samples].concat()
        );
    }

    #[test]
    fn word_reversal_speaks_words_backwards() {
        let config = SynthConfigBuilder::default()
            .reverse(ReverseMode::Words)
            .build()
            .unwrap();
        let result = model().synthesize_text("b a", &config).unwrap();
        // "a b": pau-ah ah-b b-iy iy-pau
        assert_eq!(
            result.audio.samples,
            [vec![10; 2], vec![30; 2], vec![40; 2], vec![70; 2]].concat()
        );
    }

    #[test]
    fn missing_lexicon_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let voice = dir.path().join("diphones");
        std::fs::create_dir_all(&voice).unwrap();
        assert!(matches!(
            find_lexicon(&voice),
            Err(DiphoneError::LexiconNotFound(_))
        ));

        std::fs::write(dir.path().join("cmudict.dict"), "a ah0\n").unwrap();
        assert_eq!(find_lexicon(&voice).unwrap(), dir.path().join("cmudict.dict"));
    }
}
