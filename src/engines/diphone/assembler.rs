//! Diphone sequence → waveform.

use crate::audio::{scale_samples, AudioBuffer};

use super::config::{ReverseMode, SynthConfig};
use super::inventory::DiphoneInventory;
use super::model::DiphoneError;
use super::phones::Diphone;
use super::text::Mark;

/// Whether units are currently being boosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    #[default]
    Off,
    On,
}

/// Rendered audio plus the keys that had no unit.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub audio: AudioBuffer,
    pub missing_diphones: Vec<String>,
}

/// Render a diphone sequence with the units of `inventory`.
pub fn assemble(
    sequence: &[Diphone],
    inventory: &DiphoneInventory,
    config: &SynthConfig,
) -> Result<Assembly, DiphoneError> {
    let rate = inventory.sample_rate();
    let fade_len = seconds_to_samples(rate, config.crossfade_secs);
    let mut assembly = Assembly {
        audio: AudioBuffer::new(rate),
        missing_diphones: Vec::new(),
    };

    let mut emphasis = Emphasis::Off;
    for diphone in sequence {
        emphasis = step(emphasis, diphone, inventory, config, fade_len, &mut assembly)?;
    }

    if config.reverse == ReverseMode::Signal {
        assembly.audio.reverse();
    }

    Ok(assembly)
}

/// Apply one diphone to the accumulated audio and return the new emphasis
/// state.
fn step(
    emphasis: Emphasis,
    diphone: &Diphone,
    inventory: &DiphoneInventory,
    config: &SynthConfig,
    fade_len: usize,
    assembly: &mut Assembly,
) -> Result<Emphasis, DiphoneError> {
    let rate = inventory.sample_rate();
    let key = match diphone {
        Diphone::Mark(Mark::Comma) => {
            append_silence(&mut assembly.audio.samples, rate, config.comma_silence_secs);
            return Ok(emphasis);
        }
        Diphone::Mark(Mark::Period) => {
            append_silence(&mut assembly.audio.samples, rate, config.period_silence_secs);
            return Ok(emphasis);
        }
        Diphone::Mark(Mark::EmphasisOpen) => return Ok(Emphasis::On),
        Diphone::Mark(Mark::EmphasisClose) => return Ok(Emphasis::Off),
        Diphone::Unit(key) => key.to_lowercase(),
    };

    let Some(mut samples) = inventory.unit(&key)? else {
        log::warn!("No diphone unit for '{key}'");
        assembly.missing_diphones.push(key);
        return Ok(emphasis);
    };

    if emphasis == Emphasis::On {
        scale_samples(&mut samples, config.emphasis_gain);
    }

    if config.crossfade {
        append_with_crossfade(&mut assembly.audio.samples, samples, fade_len);
    } else {
        assembly.audio.samples.extend_from_slice(&samples);
    }

    Ok(emphasis)
}

fn seconds_to_samples(rate: u32, secs: f64) -> usize {
    (f64::from(rate) * secs).floor() as usize
}

fn append_silence(dst: &mut Vec<i16>, rate: u32, secs: f64) {
    let len = seconds_to_samples(rate, secs);
    dst.resize(dst.len() + len, 0);
}

/// Linear ramp over `len` points, both endpoints included.
fn ramp(len: usize, from: f64, to: f64) -> impl Iterator<Item = f64> {
    let step = if len > 1 { (to - from) / (len - 1) as f64 } else { 0.0 };
    (0..len).map(move |i| from + step * i as f64)
}

/// Fade `src` in and out over `fade_len` samples and overlap-add its head
/// onto the tail of `dst`.
///
/// With an empty `dst` the faded unit is appended as-is. Overlapping samples
/// are summed with saturation.
fn append_with_crossfade(dst: &mut Vec<i16>, mut src: Vec<i16>, fade_len: usize) {
    let fade = fade_len.min(src.len());
    let tail_start = src.len() - fade;
    for (sample, gain) in src[..fade].iter_mut().zip(ramp(fade, 0.0, 1.0)) {
        *sample = (f64::from(*sample) * gain) as i16;
    }
    for (sample, gain) in src[tail_start..].iter_mut().zip(ramp(fade, 1.0, 0.0)) {
        *sample = (f64::from(*sample) * gain) as i16;
    }

    let overlap = fade.min(dst.len());
    if overlap == 0 {
        dst.extend_from_slice(&src);
        return;
    }

    let dst_start = dst.len() - overlap;
    for (d, s) in dst[dst_start..].iter_mut().zip(&src[..overlap]) {
        *d = d.saturating_add(*s);
    }
    dst.extend_from_slice(&src[overlap..]);
}
