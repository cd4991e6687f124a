use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::audio::AudioBuffer;

use super::model::DiphoneError;

/// Where the audio for one diphone lives.
#[derive(Debug, Clone)]
enum AudioUnit {
    /// Decoded on demand.
    File(PathBuf),
    Samples(Vec<i16>),
}

/// Storage for all diphone units of one voice.
///
/// Keys are lower-case diphone names such as `k-ae`. Every unit is assumed to
/// share the inventory's sample rate; units that turn out not to are logged
/// when they are loaded and used as-is.
#[derive(Debug, Clone)]
pub struct DiphoneInventory {
    units: HashMap<String, AudioUnit>,
    sample_rate: u32,
    /// Sample format of the recordings on disk, `None` for in-memory units.
    source_format: Option<hound::WavSpec>,
}

impl DiphoneInventory {
    /// Index every `.wav` file in a directory.
    ///
    /// The file stem, lower-cased, becomes the diphone key. The first unit
    /// (in key order) is probed to learn the shared sample rate and format.
    pub fn load(dir: &Path) -> Result<Self, DiphoneError> {
        if !dir.is_dir() {
            return Err(DiphoneError::DiphoneDirNotFound(dir.to_path_buf()));
        }

        let mut units = HashMap::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_wav = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
            if !is_wav || !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                log::warn!("Skipping diphone file with non-UTF-8 name: {}", path.display());
                continue;
            };
            units.insert(stem.to_lowercase(), AudioUnit::File(path));
        }

        let first = units
            .keys()
            .min()
            .and_then(|key| match &units[key] {
                AudioUnit::File(path) => Some(path.clone()),
                AudioUnit::Samples(_) => None,
            })
            .ok_or_else(|| DiphoneError::EmptyInventory(dir.to_path_buf()))?;
        let spec = hound::WavReader::open(&first)?.spec();

        log::info!(
            "Loaded {} diphones from {} ({} Hz, {}-bit {:?})",
            units.len(),
            dir.display(),
            spec.sample_rate,
            spec.bits_per_sample,
            spec.sample_format
        );

        Ok(Self {
            units,
            sample_rate: spec.sample_rate,
            source_format: Some(spec),
        })
    }

    /// Build an inventory from samples already in memory.
    pub fn from_samples<K, I>(sample_rate: u32, units: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Vec<i16>)>,
    {
        let units = units
            .into_iter()
            .map(|(key, samples)| (key.as_ref().to_lowercase(), AudioUnit::Samples(samples)))
            .collect();
        Self {
            units,
            sample_rate,
            source_format: None,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// WAV header of the probed unit, if the inventory came from disk.
    pub fn source_format(&self) -> Option<hound::WavSpec> {
        self.source_format
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// `key` must already be lower-case.
    pub fn contains(&self, key: &str) -> bool {
        self.units.contains_key(key)
    }

    /// Fetch the samples for a diphone.
    ///
    /// Returns `Ok(None)` when the inventory has no such key; errors only
    /// when a listed unit cannot be decoded.
    pub fn unit(&self, key: &str) -> Result<Option<Vec<i16>>, DiphoneError> {
        match self.units.get(key) {
            None => Ok(None),
            Some(AudioUnit::Samples(samples)) => Ok(Some(samples.clone())),
            Some(AudioUnit::File(path)) => {
                let audio = AudioBuffer::read_wav(path)?;
                if audio.sample_rate != self.sample_rate {
                    log::warn!(
                        "Diphone '{key}' is {} Hz but the inventory is {} Hz",
                        audio.sample_rate,
                        self.sample_rate
                    );
                }
                Ok(Some(audio.samples))
            }
        }
    }

    /// List all diphone keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.units.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_keys_are_lower_cased() {
        let inventory =
            DiphoneInventory::from_samples(16000, [("K-AE", vec![1, 2]), ("pau-k", vec![3])]);
        assert_eq!(inventory.keys(), vec!["k-ae", "pau-k"]);
        assert!(inventory.contains("k-ae"));
        assert_eq!(inventory.unit("k-ae").unwrap(), Some(vec![1, 2]));
        assert_eq!(inventory.unit("K-AE").unwrap(), None);
        assert_eq!(inventory.sample_rate(), 16000);
        assert!(inventory.source_format().is_none());
    }

    #[test]
    fn missing_directory_is_a_configuration_error() {
        let err = DiphoneInventory::load(Path::new("/definitely/not/a/diphone/dir")).unwrap_err();
        assert!(matches!(err, DiphoneError::DiphoneDirNotFound(_)));
    }

    #[test]
    fn directory_without_wavs_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), "no audio here").unwrap();

        let err = DiphoneInventory::load(dir.path()).unwrap_err();
        assert!(matches!(err, DiphoneError::EmptyInventory(_)));
    }
}
