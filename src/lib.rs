//! # diphone-tts
//!
//! A Rust library for fully offline text-to-speech by diphone concatenation.
//!
//! ## Features
//!
//! - **Diphone synthesis**: text is normalized, expanded to phones with a
//!   pronunciation dictionary, paired into diphones and rendered by joining
//!   pre-recorded units
//! - **Punctuation pauses and emphasis**: commas and sentence ends insert
//!   silence, `{...}` spans are spoken louder
//! - **Crossfading, spelling and reversal** (words, phones or signal)
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! diphone-tts = "2026.10"
//! ```
//!
//! ```no_run
//! use std::path::PathBuf;
//! use diphone_tts::{engines::diphone::DiphoneEngine, SynthesisEngine};
//!
//! let mut engine = DiphoneEngine::new();
//! engine.load_model(&PathBuf::from("voices/diphones"))?;
//!
//! let result = engine.synthesize("Hello, {world}!", None)?;
//! result.write_wav(&PathBuf::from("output.wav"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audio;
pub mod engines;

use std::path::Path;

pub use audio::{AudioBuffer, AudioError};

/// Inputs the pipeline had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Words with no entry in the pronunciation dictionary
    pub unknown_words: Vec<String>,
    /// Diphone keys with no recorded unit
    pub missing_diphones: Vec<String>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.unknown_words.is_empty() && self.missing_diphones.is_empty()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.unknown_words.extend(other.unknown_words);
        self.missing_diphones.extend(other.missing_diphones);
    }
}

/// The result of a synthesis (text-to-speech) operation.
#[derive(Debug)]
pub struct SynthesisResult {
    pub audio: AudioBuffer,
    pub diagnostics: Diagnostics,
}

impl SynthesisResult {
    /// Write the audio to a 16-bit PCM WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.audio.write_wav(path)?;
        Ok(())
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.audio.duration_secs()
    }
}

/// A text-to-speech engine backed by a voice on disk.
///
/// A voice here is a directory of recorded units plus a pronunciation
/// dictionary; there are no model weights and loading is mostly indexing.
/// Synthesis never fails on words or units the voice lacks: those are
/// skipped and listed in [`SynthesisResult::diagnostics`].
pub trait SynthesisEngine {
    /// Per-call synthesis settings (reversal, crossfade, volume, ...)
    type SynthesisParams;
    /// Voice loading settings (lexicon location, ...)
    type ModelParams: Default;

    /// Load the voice at `model_path` with default settings.
    fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.load_model_with_params(model_path, Self::ModelParams::default())
    }

    /// Load the voice at `model_path`, replacing any voice already loaded.
    ///
    /// Fails before any audio is produced if the unit directory or the
    /// dictionary is missing or unusable.
    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Drop the loaded voice.
    fn unload_model(&mut self);

    /// Render `text` as one utterance.
    ///
    /// `None` uses the engine's default settings.
    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>>;

    /// Render `text` and save it as a 16-bit mono WAV file.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        wav_path: &Path,
        params: Option<Self::SynthesisParams>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.synthesize(text, params)?.write_wav(wav_path)
    }
}
