use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::model::DiphoneError;

/// Silence inserted for a comma, in seconds.
pub const DEFAULT_COMMA_SILENCE_SECS: f64 = 0.2;
/// Silence inserted for a sentence-ending mark, in seconds.
pub const DEFAULT_PERIOD_SILENCE_SECS: f64 = 0.4;
/// Amplitude multiplier applied inside `{...}` spans.
pub const DEFAULT_EMPHASIS_GAIN: f64 = 2.0;
/// Overlap between neighbouring units when crossfading, in seconds.
pub const DEFAULT_CROSSFADE_SECS: f64 = 0.01;

/// How (and whether) an utterance is spoken backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReverseMode {
    /// Speak normally.
    #[default]
    None,
    /// Reverse the order of the words.
    Words,
    /// Reverse the order of the phones across the whole utterance.
    Phones,
    /// Mirror the rendered waveform.
    Signal,
}

/// Parameters for one synthesis run.
///
/// Build one with [`SynthConfigBuilder`], deserialize it from JSON, or start
/// from `SynthConfig::default()`.
///
/// ```
/// use diphone_tts::engines::diphone::{ReverseMode, SynthConfigBuilder};
///
/// let config = SynthConfigBuilder::default()
///     .crossfade(true)
///     .reverse(ReverseMode::Words)
///     .volume(80)
///     .build()
///     .unwrap();
/// assert_eq!(config.volume, Some(80));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(default, build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct SynthConfig {
    /// Blend neighbouring units instead of butting them together.
    pub crossfade: bool,
    pub reverse: ReverseMode,
    /// Spell every word letter by letter.
    pub spell: bool,
    pub comma_silence_secs: f64,
    pub period_silence_secs: f64,
    pub emphasis_gain: f64,
    pub crossfade_secs: f64,
    /// Output volume in percent. Values outside `0..=100` are reported and
    /// ignored.
    #[builder(setter(strip_option))]
    pub volume: Option<i32>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            crossfade: false,
            reverse: ReverseMode::None,
            spell: false,
            comma_silence_secs: DEFAULT_COMMA_SILENCE_SECS,
            period_silence_secs: DEFAULT_PERIOD_SILENCE_SECS,
            emphasis_gain: DEFAULT_EMPHASIS_GAIN,
            crossfade_secs: DEFAULT_CROSSFADE_SECS,
            volume: None,
        }
    }
}

impl SynthConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, DiphoneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, DiphoneError> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| DiphoneError::Config(format!("Failed to parse JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every duration and gain is finite and non-negative.
    pub fn validate(&self) -> Result<(), DiphoneError> {
        check_non_negative("comma_silence_secs", self.comma_silence_secs)
            .and_then(|_| check_non_negative("period_silence_secs", self.period_silence_secs))
            .and_then(|_| check_non_negative("emphasis_gain", self.emphasis_gain))
            .and_then(|_| check_non_negative("crossfade_secs", self.crossfade_secs))
            .map_err(DiphoneError::Config)
    }
}

impl SynthConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let fields = [
            ("comma_silence_secs", self.comma_silence_secs),
            ("period_silence_secs", self.period_silence_secs),
            ("emphasis_gain", self.emphasis_gain),
            ("crossfade_secs", self.crossfade_secs),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                check_non_negative(name, value)?;
            }
        }
        Ok(())
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("'{name}' must be a finite, non-negative number (got {value})"))
    }
}
