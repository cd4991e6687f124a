use std::path::{Path, PathBuf};

use crate::{SynthesisEngine, SynthesisResult};

use super::config::SynthConfig;
use super::model::{DiphoneError, DiphoneModel};

/// Parameters for configuring diphone voice loading.
#[derive(Debug, Clone, Default)]
pub struct DiphoneModelParams {
    /// Pronunciation dictionary in CMU format.
    ///
    /// `None` searches the diphone directory and its parent for
    /// `cmudict.dict`, `cmudict-0.7b`, `cmudict.txt` or `cmudict`.
    pub lexicon_path: Option<PathBuf>,
}

/// Diphone concatenation text-to-speech engine.
///
/// # Quick Start
///
/// ```rust,no_run
/// use diphone_tts::{SynthesisEngine, engines::diphone::DiphoneEngine};
/// use std::path::PathBuf;
///
/// let mut engine = DiphoneEngine::new();
/// engine.load_model(&PathBuf::from("voices/diphones"))?;
/// let result = engine.synthesize("Hello, world!", None)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Explicit lexicon
///
/// ```rust,no_run
/// use diphone_tts::{SynthesisEngine, engines::diphone::{DiphoneEngine, DiphoneModelParams}};
/// use std::path::PathBuf;
///
/// let mut engine = DiphoneEngine::new();
/// engine.load_model_with_params(
///     &PathBuf::from("voices/diphones"),
///     DiphoneModelParams { lexicon_path: Some(PathBuf::from("dicts/cmudict-0.7b")) },
/// )?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DiphoneEngine {
    model: Option<DiphoneModel>,
    model_path: Option<PathBuf>,
}

impl Default for DiphoneEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiphoneEngine {
    /// Create an engine with no voice loaded.
    pub fn new() -> Self {
        Self {
            model: None,
            model_path: None,
        }
    }

    /// Create an engine around an already assembled voice.
    pub fn with_model(model: DiphoneModel) -> Self {
        Self {
            model: Some(model),
            model_path: None,
        }
    }

    /// List all diphone keys of the loaded voice (empty if none is loaded).
    pub fn list_diphones(&self) -> Vec<&str> {
        self.model
            .as_ref()
            .map(|m| m.inventory().keys())
            .unwrap_or_default()
    }

    /// Directory the current voice was loaded from, if any.
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Synthesize a multi-sentence document.
    ///
    /// The text is split into phrases at sentence-ending marks; phrases are
    /// synthesized in order and joined into one buffer.
    pub fn synthesize_document(
        &self,
        text: &str,
        params: Option<SynthConfig>,
    ) -> Result<SynthesisResult, DiphoneError> {
        let model = self.model.as_ref().ok_or(DiphoneError::ModelNotLoaded)?;
        model.synthesize_document(text, &params.unwrap_or_default())
    }
}

impl SynthesisEngine for DiphoneEngine {
    type SynthesisParams = SynthConfig;
    type ModelParams = DiphoneModelParams;

    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let model = DiphoneModel::load(model_path, params.lexicon_path.as_deref())?;
        self.model = Some(model);
        self.model_path = Some(model_path.to_path_buf());
        Ok(())
    }

    fn unload_model(&mut self) {
        self.model = None;
        self.model_path = None;
    }

    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        let model = self.model.as_ref().ok_or(DiphoneError::ModelNotLoaded)?;
        let config = params.unwrap_or_default();
        Ok(model.synthesize_text(text, &config)?)
    }
}
