//! Diphone concatenation text-to-speech engine.
//!
//! Speech is built from a directory of short recordings, one per diphone
//! (the transition from one phone into the next), named after the two phones
//! they join: `pau-hh.wav`, `hh-ah.wav`, `ah-l.wav`, ... Words are turned into
//! phones with the CMU Pronouncing Dictionary.
//!
//! # Voice Directory Layout
//!
//! ```text
//! voices/
//! ├── cmudict.dict          # pronunciation dictionary (or cmudict-0.7b)
//! └── diphones/
//!     ├── pau-hh.wav
//!     ├── hh-ah.wav
//!     └── ...
//! ```
//!
//! `pau` is the silence phone. File names are matched case-insensitively.
//!
//! # Pipeline
//!
//! 1. **Normalization** ([`text`]): lower-case, punctuation and emphasis
//!    markers, optional spelling and word reversal.
//! 2. **Expansion** ([`phones::expand`]): dictionary lookup, silence around
//!    pauses and at both ends, optional phone reversal.
//! 3. **Sequencing** ([`phones::diphones`]): neighbouring phones paired into
//!    diphone keys.
//! 4. **Assembly** ([`assembler`]): units joined with pauses, emphasis gain,
//!    optional crossfade and optional signal reversal.
//!
//! # Markup
//!
//! | Input | Effect |
//! |---|---|
//! | `,` | short pause (0.2 s by default) |
//! | `.` `:` `?` `!` | long pause (0.4 s by default) |
//! | `{...}` | spoken louder (2x by default) |
//!
//! # Examples
//!
//! ```rust,no_run
//! use diphone_tts::{SynthesisEngine, engines::diphone::{DiphoneEngine, ReverseMode, SynthConfigBuilder}};
//! use std::path::PathBuf;
//!
//! let mut engine = DiphoneEngine::new();
//! engine.load_model(&PathBuf::from("voices/diphones"))?;
//!
//! let config = SynthConfigBuilder::default()
//!     .crossfade(true)
//!     .reverse(ReverseMode::Phones)
//!     .build()?;
//!
//! engine.synthesize_to_file("I said {no}.", &PathBuf::from("out.wav"), Some(config))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembler;
pub mod config;
pub mod engine;
pub mod inventory;
pub mod lexicon;
pub mod model;
pub mod phones;
pub mod text;

pub use config::{ReverseMode, SynthConfig, SynthConfigBuilder};
pub use engine::{DiphoneEngine, DiphoneModelParams};
pub use inventory::DiphoneInventory;
pub use lexicon::{CmuDict, Lexicon};
pub use model::{DiphoneError, DiphoneModel};
