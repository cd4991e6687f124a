//! Speech synthesis engines.
//!
//! This module contains implementations of text-to-speech engines.
//!
//! # Available Engines
//!
//! - `diphone` - Diphone concatenation (directory of WAV units + CMU dictionary)

pub mod diphone;
