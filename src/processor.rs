//! Per-file processing: parse every line, name the assets, synthesize them.
//!
//! A file moves through three stages. Output directories are resolved and
//! created, and numbering is seeded from disk (or reset, for the alphabet
//! bin). Then each line is parsed and both language sides are synthesized one
//! after the other. Finally the per-asset outcomes are folded into a
//! [`CategoryReport`].
//!
//! Bad lines and synthesis failures are recorded and skipped. Any other error
//! stops the file but keeps the outcomes gathered up to that point.

use std::path::{Path, PathBuf};

use crate::alphabet::{self, LanguageHint};
use crate::config::BinKind;
use crate::naming::{AssetNamer, AudioAsset};
use crate::parser::{ParseMode, ParsedPair, VocabLine};
use crate::sequence::{clear_audio, next_index};
use crate::{GeneratorConfig, Language, Synthesizer, VocabError};

/// An input text file and its place in the bin/category taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFile {
    pub path: PathBuf,
    /// Bin folder the file lives in; empty for the flat layout.
    pub bin: String,
    /// File stem, including any `english_`/`korean_` prefix.
    pub category: String,
}

impl CategoryFile {
    pub fn new(path: impl Into<PathBuf>, bin: impl Into<String>) -> Self {
        let path = path.into();
        let category = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            bin: bin.into(),
            category,
        }
    }

    pub fn hint(&self) -> LanguageHint {
        LanguageHint::from_category(&self.category)
    }

    pub fn base_category(&self) -> &str {
        alphabet::base_category(&self.category)
    }
}

/// Result of one synthesis attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Generated(AudioAsset),
    Failed { language: Language, reason: String },
}

impl AssetOutcome {
    pub fn language(&self) -> Language {
        match self {
            AssetOutcome::Generated(asset) => asset.language,
            AssetOutcome::Failed { language, .. } => *language,
        }
    }
}

/// Successes and failures for one language of one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageTally {
    /// `NNN_label` stems of the files written.
    pub generated: Vec<String>,
    /// Failed labels, or a line diagnostic for lines that did not parse.
    pub failed: Vec<String>,
}

/// Everything that happened while processing one category file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub bin: String,
    pub category: String,
    pub korean: LanguageTally,
    pub english: LanguageTally,
    /// Why processing stopped early, if it did.
    pub aborted: Option<String>,
}

impl CategoryReport {
    fn from_outcomes(file: &CategoryFile, outcomes: Vec<AssetOutcome>, aborted: Option<String>) -> Self {
        let mut report = Self {
            bin: file.bin.clone(),
            category: file.category.clone(),
            korean: LanguageTally::default(),
            english: LanguageTally::default(),
            aborted,
        };
        for outcome in outcomes {
            let tally = report.tally_mut(outcome.language());
            match outcome {
                AssetOutcome::Generated(asset) => tally.generated.push(asset.stem()),
                AssetOutcome::Failed { reason, .. } => tally.failed.push(reason),
            }
        }
        report
    }

    pub fn tally(&self, language: Language) -> &LanguageTally {
        match language {
            Language::Korean => &self.korean,
            Language::English => &self.english,
        }
    }

    fn tally_mut(&mut self, language: Language) -> &mut LanguageTally {
        match language {
            Language::Korean => &mut self.korean,
            Language::English => &mut self.english,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.korean.failed.is_empty() || !self.english.failed.is_empty() || self.aborted.is_some()
    }
}

/// Next index per language while a file is processed.
///
/// The two languages advance independently: a failed side leaves its index
/// free while the other side moves on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursors {
    korean: u32,
    english: u32,
}

impl Cursors {
    fn get(self, language: Language) -> u32 {
        match language {
            Language::Korean => self.korean,
            Language::English => self.english,
        }
    }

    fn advance(self, language: Language) -> Self {
        match language {
            Language::Korean => Self {
                korean: self.korean + 1,
                ..self
            },
            Language::English => Self {
                english: self.english + 1,
                ..self
            },
        }
    }

    fn with(self, language: Language, index: u32) -> Self {
        match language {
            Language::Korean => Self {
                korean: index,
                ..self
            },
            Language::English => Self {
                english: index,
                ..self
            },
        }
    }
}

/// An output directory and the language written into it.
#[derive(Debug, Clone)]
struct Target {
    language: Language,
    dir: PathBuf,
}

/// Turns category files into audio assets through a [`Synthesizer`].
pub struct CategoryProcessor<'a, S> {
    config: &'a GeneratorConfig,
    namer: AssetNamer,
    synth: S,
}

impl<'a, S: Synthesizer> CategoryProcessor<'a, S> {
    pub fn new(config: &'a GeneratorConfig, synth: S) -> Self {
        Self {
            config,
            namer: AssetNamer::new(config.audio_extension.clone()),
            synth,
        }
    }

    pub fn into_synthesizer(self) -> S {
        self.synth
    }

    /// Process `file` end to end. Never fails: errors end up in the report.
    pub fn process(&mut self, file: &CategoryFile) -> CategoryReport {
        log::info!(
            "Processing category: {} (bin: {})",
            file.category,
            if file.bin.is_empty() { "-" } else { file.bin.as_str() }
        );

        let mut outcomes = Vec::new();
        let aborted = match self.run(file, &mut outcomes) {
            Ok(()) => None,
            Err(err) => {
                log::error!("Error processing file {}: {err}", file.path.display());
                Some(err.to_string())
            }
        };
        CategoryReport::from_outcomes(file, outcomes, aborted)
    }

    fn run(&mut self, file: &CategoryFile, outcomes: &mut Vec<AssetOutcome>) -> Result<(), VocabError> {
        let kind = self.config.bin_kind(&file.bin);
        let targets = self.prepare_targets(file, kind)?;
        let mut cursors = self.seed_cursors(&targets, kind)?;

        let content = std::fs::read_to_string(&file.path)
            .map_err(|e| VocabError::file_read(&file.path, e))?;
        let mode = self.parse_mode(kind);

        for line in VocabLine::enumerate(&content) {
            cursors = self.step(file, kind, &targets, line, mode, cursors, outcomes)?;
        }
        Ok(())
    }

    fn parse_mode(&self, kind: BinKind) -> ParseMode {
        match kind {
            BinKind::Alphabet => ParseMode::Letter,
            BinKind::Vocabulary if self.config.track_romanization => ParseMode::Romanized,
            BinKind::Vocabulary => ParseMode::Pair,
        }
    }

    fn prepare_targets(&self, file: &CategoryFile, kind: BinKind) -> Result<Vec<Target>, VocabError> {
        let languages = match kind {
            BinKind::Alphabet => file.hint().languages(),
            BinKind::Vocabulary => Language::ALL.to_vec(),
        };

        languages
            .into_iter()
            .map(|language| {
                let dir = self
                    .config
                    .category_output_dir(language, &file.bin, &file.category);
                std::fs::create_dir_all(&dir).map_err(|e| VocabError::directory(&dir, e))?;
                log::debug!("{language} output directory: {}", dir.display());
                Ok(Target { language, dir })
            })
            .collect()
    }

    fn seed_cursors(&self, targets: &[Target], kind: BinKind) -> Result<Cursors, VocabError> {
        let ext = self.namer.extension();
        let mut cursors = Cursors::default();
        for target in targets {
            let start = match kind {
                BinKind::Alphabet => {
                    clear_audio(&target.dir, ext)?;
                    0
                }
                BinKind::Vocabulary => next_index(&target.dir, ext)?,
            };
            log::info!("Starting {} file numbering at: {start:03}", target.language);
            cursors = cursors.with(target.language, start);
        }
        Ok(cursors)
    }

    #[allow(clippy::too_many_arguments)]
    fn step(
        &mut self,
        file: &CategoryFile,
        kind: BinKind,
        targets: &[Target],
        line: VocabLine<'_>,
        mode: ParseMode,
        cursors: Cursors,
        outcomes: &mut Vec<AssetOutcome>,
    ) -> Result<Cursors, VocabError> {
        let pair = match line.parse(mode) {
            Ok(Some(pair)) => pair,
            Ok(None) => return Ok(cursors),
            Err(err) => {
                let reason = format!("{err}. Skipping.");
                log::warn!("{reason}");
                // Both languages record the line so failure counts stay symmetric.
                outcomes.extend(Language::ALL.iter().map(|&language| AssetOutcome::Failed {
                    language,
                    reason: reason.clone(),
                }));
                return Ok(cursors);
            }
        };

        log::debug!(
            "Processing pair on line {}: {} / {}",
            line.number,
            pair.primary,
            pair.secondary
        );

        match kind {
            BinKind::Vocabulary => self.synthesize_pair(targets, &pair, cursors, outcomes),
            BinKind::Alphabet => {
                self.synthesize_letter(file.base_category(), targets, &pair, cursors, outcomes)
            }
        }
    }

    fn synthesize_pair(
        &mut self,
        targets: &[Target],
        pair: &ParsedPair,
        mut cursors: Cursors,
        outcomes: &mut Vec<AssetOutcome>,
    ) -> Result<Cursors, VocabError> {
        for target in targets {
            let text = match target.language {
                Language::Korean => pair.primary.as_str(),
                Language::English => pair.secondary.as_str(),
            };
            let asset = AudioAsset::new(cursors.get(target.language), text, target.language, false);
            let slow = target.language == Language::Korean;
            if self.render(&target.dir, asset, text, slow, outcomes)? {
                cursors = cursors.advance(target.language);
            }
        }
        Ok(cursors)
    }

    /// Two recordings per letter share one index; only the sound recording advances it.
    fn synthesize_letter(
        &mut self,
        base: &str,
        targets: &[Target],
        pair: &ParsedPair,
        mut cursors: Cursors,
        outcomes: &mut Vec<AssetOutcome>,
    ) -> Result<Cursors, VocabError> {
        let character = pair.character();
        let sound_text = alphabet::sound_example(base, character).unwrap_or(pair.pronunciation());

        for target in targets {
            let index = cursors.get(target.language);
            let korean = target.language == Language::Korean;

            let name = AudioAsset::new(index, character, target.language, true);
            self.render(&target.dir, name, character, korean, outcomes)?;

            let sound = AudioAsset::new(index, character, target.language, false);
            let slow = korean || alphabet::is_sound_category(base);
            if self.render(&target.dir, sound, sound_text, slow, outcomes)? {
                cursors = cursors.advance(target.language);
            }
        }
        Ok(cursors)
    }

    /// Synthesize one asset. Returns whether the file was written.
    fn render(
        &mut self,
        dir: &Path,
        asset: AudioAsset,
        text: &str,
        slow: bool,
        outcomes: &mut Vec<AssetOutcome>,
    ) -> Result<bool, VocabError> {
        let path = dir.join(asset.file_name(&self.namer));
        log::debug!(
            "Generating {} speech for: {text} -> {}",
            asset.language.code(),
            path.display()
        );

        match self.synth.synthesize_to_file(text, asset.language, slow, &path) {
            Ok(()) => {
                outcomes.push(AssetOutcome::Generated(asset));
                Ok(true)
            }
            Err(err) if err.is_recoverable() => {
                log::warn!("Error generating speech for '{text}': {err}");
                outcomes.push(AssetOutcome::Failed {
                    language: asset.language,
                    reason: text.to_string(),
                });
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
