//! Static generator configuration.
//!
//! Every field has a default matching the conventional on-disk layout:
//!
//! ```text
//! Categories/                 # input root
//! ├── Alphabet/korean_consonants.txt
//! ├── Words/animals.txt
//! └── Phrases/greetings.txt
//! Korean/{bin}/{category}/    # generated Korean audio
//! English/{bin}/{category}/   # generated English audio
//! alphabet_config.json        # one index document per bin
//! ```

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{Language, VocabError};

/// How a bin's files are numbered and indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinKind {
    /// Word/phrase pairs: numbering resumes from disk, symmetric index matching.
    Vocabulary,
    /// Letters: output directories are cleared on every run, partial index entries.
    Alphabet,
}

/// Configuration shared by the orchestrator, processor and config builder.
///
/// ```
/// use vocab_tts::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .categories_root("vocab")
///     .target_bin("Words")
///     .build()
///     .unwrap();
/// assert_eq!(config.selected_bins(), vec!["Words"]);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default, setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct GeneratorConfig {
    /// Root directory holding the input `.txt` files (optionally inside bin folders).
    pub categories_root: PathBuf,
    /// Directory under which the per-language audio trees are created.
    pub output_root: PathBuf,
    /// Name of the Korean audio tree.
    pub korean_dir: String,
    /// Name of the English audio tree.
    pub english_dir: String,
    /// Every known bin; each gets an output skeleton even when it has no input.
    pub bins: Vec<String>,
    /// Restrict processing to a single bin. `None` processes all of them.
    #[builder(setter(into, strip_option))]
    pub target_bin: Option<String>,
    /// The bin whose files are letters rather than word pairs.
    pub alphabet_bin: String,
    /// Parse lines as `korean, romanization, english` triples.
    pub track_romanization: bool,
    /// Extension of generated audio files, without the dot.
    pub audio_extension: String,
    /// Directory the JSON index documents are written to.
    pub config_output_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            categories_root: PathBuf::from("Categories"),
            output_root: PathBuf::from("."),
            korean_dir: "Korean".to_string(),
            english_dir: "English".to_string(),
            bins: vec![
                "Alphabet".to_string(),
                "Words".to_string(),
                "Phrases".to_string(),
            ],
            target_bin: None,
            alphabet_bin: "Alphabet".to_string(),
            track_romanization: false,
            audio_extension: "mp3".to_string(),
            config_output_dir: PathBuf::from("."),
        }
    }
}

impl GeneratorConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let defaults = GeneratorConfig::default();
        check_layout(
            self.audio_extension
                .as_deref()
                .unwrap_or(&defaults.audio_extension),
            self.korean_dir.as_deref().unwrap_or(&defaults.korean_dir),
            self.english_dir.as_deref().unwrap_or(&defaults.english_dir),
        )
    }
}

/// Rules shared by the builder and JSON loading.
fn check_layout(audio_extension: &str, korean_dir: &str, english_dir: &str) -> Result<(), String> {
    if audio_extension.trim().is_empty() || audio_extension.starts_with('.') {
        return Err(format!(
            "audio_extension must be a bare extension, got {audio_extension:?}"
        ));
    }
    if korean_dir == english_dir {
        return Err("korean_dir and english_dir must differ".to_string());
    }
    Ok(())
}

impl GeneratorConfig {
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, VocabError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| VocabError::file_read(path, e))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        check_layout(
            &config.audio_extension,
            &config.korean_dir,
            &config.english_dir,
        )
        .map_err(VocabError::Config)?;
        Ok(config)
    }

    /// Bins to index: the target bin alone, or every known bin. With no
    /// known bins this is the flat layout (the empty bin).
    pub fn selected_bins(&self) -> Vec<&str> {
        match &self.target_bin {
            Some(bin) => vec![bin.as_str()],
            None if self.bins.is_empty() => vec![""],
            None => self.bins.iter().map(String::as_str).collect(),
        }
    }

    pub fn bin_kind(&self, bin: &str) -> BinKind {
        if !bin.is_empty() && bin.eq_ignore_ascii_case(&self.alphabet_bin) {
            BinKind::Alphabet
        } else {
            BinKind::Vocabulary
        }
    }

    pub fn language_dir(&self, language: Language) -> &str {
        match language {
            Language::Korean => &self.korean_dir,
            Language::English => &self.english_dir,
        }
    }

    /// `{output_root}/{Language}/{bin}`; the flat layout (empty bin) skips the bin level.
    pub fn bin_output_dir(&self, language: Language, bin: &str) -> PathBuf {
        let base = self.output_root.join(self.language_dir(language));
        if bin.is_empty() {
            base
        } else {
            base.join(bin)
        }
    }

    pub fn category_output_dir(&self, language: Language, bin: &str, category: &str) -> PathBuf {
        self.bin_output_dir(language, bin).join(category)
    }

    /// Directory holding a bin's source text files.
    pub fn bin_source_dir(&self, bin: &str) -> PathBuf {
        if bin.is_empty() {
            self.categories_root.clone()
        } else {
            self.categories_root.join(bin)
        }
    }

    /// Forward-slash path of an audio file as referenced from the index document.
    pub fn audio_reference(
        &self,
        language: Language,
        bin: &str,
        category: &str,
        file_name: &str,
    ) -> String {
        let lang = self.language_dir(language);
        if bin.is_empty() {
            format!("{lang}/{category}/{file_name}")
        } else {
            format!("{lang}/{bin}/{category}/{file_name}")
        }
    }

    /// File name of the index document written for `bin`.
    pub fn config_file_name(&self, bin: &str) -> String {
        match bin.to_ascii_lowercase().as_str() {
            "" | "words" => "word_config.json".to_string(),
            other => format!("{other}_config.json"),
        }
    }

    pub fn config_file_path(&self, bin: &str) -> PathBuf {
        self.config_output_dir.join(self.config_file_name(bin))
    }
}
