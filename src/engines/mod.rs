//! Speech synthesis engines.
//!
//! This module contains implementations of [`Synthesizer`](crate::Synthesizer).
//!
//! # Available Engines
//!
//! Enable engines via Cargo features:
//! - `espeak` - espeak-ng command line tool (WAV output, espeak-ng required)

#[cfg(feature = "espeak")]
pub mod espeak;
