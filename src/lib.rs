//! # vocab-tts
//!
//! Turns plain-text Korean/English vocabulary lists into numbered audio files
//! and a per-bin JSON index that a flashcard front-end can load.
//!
//! ## Features
//!
//! - **Multi-format line parsing**: arrow, comma and space separated pairs
//! - **Resumable numbering**: new files continue from the highest index on disk
//! - **Bin taxonomy**: `Alphabet`, `Words`, `Phrases` (or a flat legacy layout)
//! - **Disk-derived index**: the JSON config is rebuilt from the files that exist
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! vocab-tts = { version = "2026.10", features = ["espeak"] }
//! ```
//!
//! ```ignore
//! use vocab_tts::{
//!     engines::espeak::EspeakSynthesizer, BinOrchestrator, GeneratorConfig, ManifestBuilder,
//! };
//!
//! let config = GeneratorConfig::default();
//! let mut orchestrator = BinOrchestrator::new(&config, EspeakSynthesizer::new());
//! let report = orchestrator.run()?;
//! println!("{report}");
//!
//! ManifestBuilder::new(&config).build_all()?;
//! # Ok::<(), vocab_tts::VocabError>(())
//! ```

pub mod alphabet;
pub mod config;
pub mod engines;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod orchestrator;
pub mod parser;
pub mod processor;
pub mod sequence;

#[cfg(test)]
mod testing;

pub use config::{BinKind, GeneratorConfig, GeneratorConfigBuilder};
pub use error::VocabError;
pub use manifest::{CategoryEntry, ConfigDocument, ManifestBuilder, MatchPolicy};
pub use naming::{AssetNamer, AudioAsset};
pub use orchestrator::{BatchReport, BinOrchestrator};
pub use parser::{ParseMode, ParsedPair, VocabLine};
pub use processor::{AssetOutcome, CategoryFile, CategoryProcessor, CategoryReport};

use std::fmt;
use std::path::Path;

/// One of the two locales an asset can be spoken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Korean,
    English,
}

impl Language {
    /// Both locales, in the order assets are synthesized.
    pub const ALL: [Language; 2] = [Language::Korean, Language::English];

    /// Language code handed to the synthesis backend.
    pub fn code(self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
        }
    }

    /// Filename prefix that restricts an alphabet category to this language.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Language::Korean => "korean_",
            Language::English => "english_",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Korean => f.write_str("Korean"),
            Language::English => f.write_str("English"),
        }
    }
}

/// Common interface for speech synthesis backends.
///
/// The generator treats synthesis as an opaque call: text in, encoded audio
/// bytes out. Any transport or provider problem must be reported as
/// [`VocabError::Synthesis`] so the caller can record it and move on.
pub trait Synthesizer {
    /// Synthesize `text` in `language`, optionally at a slower speaking rate.
    fn synthesize(
        &mut self,
        text: &str,
        language: Language,
        slow: bool,
    ) -> Result<Vec<u8>, VocabError>;

    /// Synthesize `text` and write the audio to `path`.
    ///
    /// Default implementation removes any existing file at `path`, then calls
    /// `synthesize()` and writes the bytes. Write failures surface as
    /// [`VocabError::Io`], distinct from synthesis failures.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        language: Language,
        slow: bool,
        path: &Path,
    ) -> Result<(), VocabError> {
        if path.exists() {
            log::debug!("Removing existing file {}", path.display());
            std::fs::remove_file(path)?;
        }
        let audio = self.synthesize(text, language, slow)?;
        std::fs::write(path, audio)?;
        Ok(())
    }
}

impl<S: Synthesizer + ?Sized> Synthesizer for &mut S {
    fn synthesize(
        &mut self,
        text: &str,
        language: Language,
        slow: bool,
    ) -> Result<Vec<u8>, VocabError> {
        (**self).synthesize(text, language, slow)
    }

    fn synthesize_to_file(
        &mut self,
        text: &str,
        language: Language,
        slow: bool,
        path: &Path,
    ) -> Result<(), VocabError> {
        (**self).synthesize_to_file(text, language, slow, path)
    }
}
