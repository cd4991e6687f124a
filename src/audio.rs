//! Sample buffers and WAV file I/O.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Errors raised while reading, writing or rescaling an [`AudioBuffer`].
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("Volume must be between 0 and 100, got {0}")]
    InvalidVolume(i32),
}

/// Mono 16-bit PCM audio at a fixed sample rate.
///
/// Buffers are handed between pipeline stages by value; nothing keeps a
/// second reference to the samples once they move on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioBuffer {
    /// Raw 16-bit samples
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create an empty buffer at the given rate.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    pub fn from_samples(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Decode a WAV file into 16-bit mono samples.
    ///
    /// Only the first channel of multi-channel files is kept. Integer
    /// formats wider than 16 bits are shifted down and float formats are
    /// scaled to the 16-bit range.
    pub fn read_wav(path: &Path) -> Result<Self, AudioError> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let channels = usize::from(spec.channels.max(1));

        let samples = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Int, bits) if bits <= 16 => {
                let shift = 16 - u32::from(bits);
                reader
                    .samples::<i16>()
                    .step_by(channels)
                    .map(|s| s.map(|v| v << shift))
                    .collect::<Result<Vec<_>, _>>()?
            }
            (hound::SampleFormat::Int, bits) => {
                let shift = u32::from(bits) - 16;
                reader
                    .samples::<i32>()
                    .step_by(channels)
                    .map(|s| s.map(|v| (v >> shift) as i16))
                    .collect::<Result<Vec<_>, _>>()?
            }
            (hound::SampleFormat::Float, _) => reader
                .samples::<f32>()
                .step_by(channels)
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16))
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    /// Write the audio to a 16-bit PCM mono WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), AudioError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append another buffer's samples. Rates are assumed to match.
    pub fn append(&mut self, other: AudioBuffer) {
        if self.samples.is_empty() && self.sample_rate == 0 {
            self.sample_rate = other.sample_rate;
        } else if other.sample_rate != self.sample_rate && !other.is_empty() {
            log::warn!(
                "Appending {} Hz audio to a {} Hz buffer",
                other.sample_rate,
                self.sample_rate
            );
        }
        self.samples.extend(other.samples);
    }

    /// Mirror the buffer sample for sample.
    pub fn reverse(&mut self) {
        self.samples.reverse();
    }

    /// Rescale the amplitude to `percent` of its current value.
    ///
    /// Percentages outside `0..=100` are rejected and the samples are left
    /// untouched. Scaled values are truncated toward zero.
    pub fn set_volume(&mut self, percent: i32) -> Result<(), AudioError> {
        if !(0..=100).contains(&percent) {
            return Err(AudioError::InvalidVolume(percent));
        }
        let factor = f64::from(percent) / 100.0;
        for sample in &mut self.samples {
            *sample = (f64::from(*sample) * factor) as i16;
        }
        Ok(())
    }
}

/// Multiply every sample by `gain`, rounding to the nearest integer.
///
/// Results beyond the 16-bit range saturate at `i16::MIN`/`i16::MAX`, so a
/// large gain on loud material clips.
pub fn scale_samples(samples: &mut [i16], gain: f64) {
    for sample in samples {
        *sample = (f64::from(*sample) * gain).round() as i16;
    }
}

/// Return `path` with a `.wav` suffix appended unless it already has one.
pub fn with_wav_extension(path: &Path) -> PathBuf {
    let has_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
    if has_wav {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".wav");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_volume_above_range_and_keeps_samples() {
        let mut audio = AudioBuffer::from_samples(vec![100, -200, 32767], 16000);
        let before = audio.clone();
        let err = audio.set_volume(150).unwrap_err();
        assert!(matches!(err, AudioError::InvalidVolume(150)));
        assert_eq!(audio, before);
    }

    #[test]
    fn rejects_negative_volume() {
        let mut audio = AudioBuffer::from_samples(vec![5, 6], 16000);
        assert!(audio.set_volume(-1).is_err());
        assert_eq!(audio.samples, vec![5, 6]);
    }

    #[test]
    fn halves_amplitude_at_fifty_percent() {
        let mut audio = AudioBuffer::from_samples(vec![100, -201, 3], 16000);
        audio.set_volume(50).unwrap();
        assert_eq!(audio.samples, vec![50, -100, 1]);
    }

    #[test]
    fn volume_bounds_are_inclusive() {
        let mut audio = AudioBuffer::from_samples(vec![1000, -1000], 16000);
        audio.set_volume(100).unwrap();
        assert_eq!(audio.samples, vec![1000, -1000]);
        audio.set_volume(0).unwrap();
        assert_eq!(audio.samples, vec![0, 0]);
    }

    #[test]
    fn gain_saturates_instead_of_wrapping() {
        let mut samples = vec![20000, -20000, 3];
        scale_samples(&mut samples, 2.0);
        assert_eq!(samples, vec![i16::MAX, i16::MIN, 6]);
    }

    #[test]
    fn appends_wav_suffix_when_missing() {
        assert_eq!(with_wav_extension(Path::new("out")), PathBuf::from("out.wav"));
        assert_eq!(
            with_wav_extension(Path::new("out.mp3")),
            PathBuf::from("out.mp3.wav")
        );
        assert_eq!(
            with_wav_extension(Path::new("dir/out.WAV")),
            PathBuf::from("dir/out.WAV")
        );
    }

    #[test]
    fn duration_of_empty_buffer_is_zero() {
        assert_eq!(AudioBuffer::default().duration_secs(), 0.0);
        let audio = AudioBuffer::from_samples(vec![0; 8000], 16000);
        assert!((audio.duration_secs() - 0.5).abs() < 1e-9);
    }
}
