//! Index documents rebuilt from the audio files on disk.
//!
//! The builder never looks at processor results. It lists each category's
//! English and Korean directories, joins files on their three-digit index
//! prefix and recovers labels from file names. Two join policies exist:
//!
//! - [`MatchPolicy::Symmetric`] (word and phrase bins): an index missing on
//!   either side produces no entry.
//! - [`MatchPolicy::Partial`] (alphabet bin): every index found on either side
//!   produces an entry, with empty fields for the missing side, plus the
//!   `_name` recordings.

mod document;

pub use document::{CategoryEntry, ConfigDocument};

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::alphabet::base_category;
use crate::config::BinKind;
use crate::naming::{clean_label, extract_label, AssetNamer};
use crate::parser::{ParseMode, VocabLine};
use crate::sequence::{index_prefix, list_audio_files};
use crate::{GeneratorConfig, Language, VocabError};

/// How English and Korean files are joined into entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Only indices present on both sides become entries.
    Symmetric,
    /// Every index becomes an entry; missing sides are left empty.
    Partial,
}

impl MatchPolicy {
    pub fn for_bin(kind: BinKind) -> Self {
        match kind {
            BinKind::Vocabulary => MatchPolicy::Symmetric,
            BinKind::Alphabet => MatchPolicy::Partial,
        }
    }
}

/// Audio files of one category directory, keyed by index prefix.
///
/// Name recordings are kept by file name, not index: a failed sound
/// recording leaves its index to the next letter, so two name files can
/// share a prefix.
#[derive(Debug, Default)]
struct IndexedFiles {
    /// Directory name as it appears in audio references.
    dir_name: String,
    sound: BTreeMap<String, String>,
    names: BTreeSet<String>,
}

/// Builds and writes [`ConfigDocument`]s.
pub struct ManifestBuilder<'a> {
    config: &'a GeneratorConfig,
    namer: AssetNamer,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            namer: AssetNamer::new(config.audio_extension.clone()),
        }
    }

    /// Build the document for `bin` with the policy its kind calls for.
    pub fn build(&self, bin: &str) -> Result<ConfigDocument, VocabError> {
        self.build_with(bin, MatchPolicy::for_bin(self.config.bin_kind(bin)))
    }

    pub fn build_with(&self, bin: &str, policy: MatchPolicy) -> Result<ConfigDocument, VocabError> {
        log::info!("Starting configuration file generation for bin {bin:?} ({policy:?})");
        let doc = match policy {
            MatchPolicy::Symmetric => self.build_symmetric(bin)?,
            MatchPolicy::Partial => self.build_partial(bin)?,
        };
        log::info!(
            "Bin {bin:?}: {} categories, {} entries",
            doc.categories.len(),
            doc.total_entries()
        );
        Ok(doc)
    }

    /// Write `doc` to its configured location and return the path.
    pub fn write(&self, doc: &ConfigDocument) -> Result<PathBuf, VocabError> {
        let path = self.config.config_file_path(&doc.bin);
        doc.write_to(&path)?;
        log::info!("Configuration file generated: {}", path.display());
        Ok(path)
    }

    /// Build and write a document for every selected bin.
    pub fn build_all(&self) -> Result<Vec<PathBuf>, VocabError> {
        self.config
            .selected_bins()
            .into_iter()
            .map(|bin| {
                let doc = self.build(bin)?;
                self.write(&doc)
            })
            .collect()
    }

    /// Category directories of `bin` for `language`, sorted. The flat layout
    /// skips directories named after known bins.
    fn list_categories(&self, language: Language, bin: &str) -> Result<Vec<String>, VocabError> {
        let dir = self.config.bin_output_dir(language, bin);
        if !dir.is_dir() {
            log::warn!("Directory {} not found", dir.display());
            return Ok(Vec::new());
        }

        let mut categories = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(|e| VocabError::directory(&dir, e))? {
            let entry = entry.map_err(|e| VocabError::directory(&dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if bin.is_empty() && self.config.bins.iter().any(|b| b == &name) {
                continue;
            }
            categories.push(name);
        }
        categories.sort();
        Ok(categories)
    }

    /// List `dir` by index prefix. With `split_names`, `_name` recordings are
    /// set aside instead of competing for their index.
    fn index_files(
        &self,
        dir: &Path,
        dir_name: &str,
        split_names: bool,
    ) -> Result<IndexedFiles, VocabError> {
        let mut indexed = IndexedFiles {
            dir_name: dir_name.to_string(),
            ..Default::default()
        };
        for file in list_audio_files(dir, self.namer.extension())? {
            let Some(key) = index_prefix(&file).map(str::to_string) else {
                continue;
            };
            if split_names && self.namer.is_name_variant(&file) {
                indexed.names.insert(file);
            } else {
                indexed.sound.insert(key, file);
            }
        }
        Ok(indexed)
    }

    fn build_symmetric(&self, bin: &str) -> Result<ConfigDocument, VocabError> {
        let mut doc = ConfigDocument::new(bin);
        doc.categories = self.list_categories(Language::English, bin)?;

        for category in &doc.categories {
            let entries = doc.words.entry(category.clone()).or_default();

            let ko_dir = self.config.category_output_dir(Language::Korean, bin, category);
            if !ko_dir.is_dir() {
                log::warn!(
                    "Korean category directory {} not found. Skipping.",
                    ko_dir.display()
                );
                continue;
            }
            let en_dir = self.config.category_output_dir(Language::English, bin, category);

            let english = self.index_files(&en_dir, category, false)?;
            let korean = self.index_files(&ko_dir, category, false)?;
            for (index, en_file) in &english.sound {
                let Some(ko_file) = korean.sound.get(index) else {
                    continue;
                };
                entries.push(CategoryEntry {
                    index: index.clone(),
                    english: extract_label(en_file),
                    korean: extract_label(ko_file),
                    audio_en: self.reference(Language::English, bin, category, en_file),
                    audio_ko: self.reference(Language::Korean, bin, category, ko_file),
                    audio_en_name: None,
                    audio_ko_name: None,
                });
            }
            log::debug!("Category '{category}': added {} word pairs", entries.len());
        }
        Ok(doc)
    }

    fn build_partial(&self, bin: &str) -> Result<ConfigDocument, VocabError> {
        let en_dirs = self.list_categories(Language::English, bin)?;
        let ko_dirs = self.list_categories(Language::Korean, bin)?;

        let bases: BTreeSet<&str> = en_dirs
            .iter()
            .chain(&ko_dirs)
            .map(|d| base_category(d))
            .collect();

        let mut doc = ConfigDocument::new(bin);
        doc.categories = bases.iter().map(|b| b.to_string()).collect();

        for base in bases {
            let english = self.side_files(Language::English, bin, base, &en_dirs)?;
            let korean = self.side_files(Language::Korean, bin, base, &ko_dirs)?;
            let pronunciations = match &korean {
                Some(side) => self.recover_pronunciations(bin, &side.dir_name),
                None => HashMap::new(),
            };

            let indices: BTreeSet<&String> = [&english, &korean]
                .into_iter()
                .flatten()
                .flat_map(|side| side.sound.keys())
                .collect();

            let mut entries = Vec::with_capacity(indices.len());
            for index in indices {
                let mut entry = CategoryEntry::blank(index.clone());
                if let Some(side) = &english {
                    self.fill_side(&mut entry, Language::English, bin, side, index);
                }
                if let Some(side) = &korean {
                    self.fill_side(&mut entry, Language::Korean, bin, side, index);
                }
                if entry.english.is_empty() {
                    if let Some(pronunciation) = pronunciations.get(&entry.korean) {
                        entry.english = pronunciation.clone();
                    }
                }
                entries.push(entry);
            }
            log::debug!("Added {} entries for category '{base}'", entries.len());
            doc.words.insert(base.to_string(), entries);
        }
        Ok(doc)
    }

    /// Files for `base` on one side: the `english_`/`korean_` prefixed
    /// directory if present, else the unprefixed one.
    fn side_files(
        &self,
        language: Language,
        bin: &str,
        base: &str,
        dirs: &[String],
    ) -> Result<Option<IndexedFiles>, VocabError> {
        let prefixed = format!("{}{base}", language.file_prefix());
        let Some(dir_name) = [prefixed.as_str(), base]
            .into_iter()
            .find(|name| dirs.iter().any(|d| d == name))
        else {
            return Ok(None);
        };

        let dir = self.config.category_output_dir(language, bin, dir_name);
        self.index_files(&dir, dir_name, true).map(Some)
    }

    fn fill_side(
        &self,
        entry: &mut CategoryEntry,
        language: Language,
        bin: &str,
        side: &IndexedFiles,
        index: &str,
    ) {
        let Some(file) = side.sound.get(index) else {
            return;
        };
        let label = extract_label(file);
        let audio = self.reference(language, bin, &side.dir_name, file);
        let name_file = self.namer.name_variant_of(file);
        let name_audio = if side.names.contains(&name_file) {
            self.reference(language, bin, &side.dir_name, &name_file)
        } else {
            String::new()
        };

        match language {
            Language::English => {
                entry.english = label;
                entry.audio_en = audio;
                entry.audio_en_name = Some(name_audio);
            }
            Language::Korean => {
                entry.korean = label;
                entry.audio_ko = audio;
                entry.audio_ko_name = Some(name_audio);
            }
        }
    }

    /// Character → pronunciation, re-read from the category's source text.
    ///
    /// Keys go through the same clean-then-extract path as file labels so they
    /// match what [`extract_label`] recovers.
    fn recover_pronunciations(&self, bin: &str, category: &str) -> HashMap<String, String> {
        let path = self
            .config
            .bin_source_dir(bin)
            .join(format!("{category}.txt"));
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("No source text for {category} at {}: {e}", path.display());
                return HashMap::new();
            }
        };

        VocabLine::enumerate(&content)
            .filter_map(|line| line.parse(ParseMode::Letter).ok().flatten())
            .map(|pair| {
                let key = clean_label(pair.character()).replace('_', " ");
                (key, pair.secondary)
            })
            .collect()
    }

    fn reference(&self, language: Language, bin: &str, category: &str, file: &str) -> String {
        self.config.audio_reference(language, bin, category, file)
    }
}

#[cfg(test)]
mod tests {
    use super::{ManifestBuilder, MatchPolicy};
    use crate::{GeneratorConfig, Language};
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> GeneratorConfig {
        GeneratorConfig::builder()
            .categories_root(dir.path().join("Categories"))
            .output_root(dir.path().to_path_buf())
            .config_output_dir(dir.path().to_path_buf())
            .build()
            .unwrap()
    }

    fn audio(config: &GeneratorConfig, language: Language, bin: &str, category: &str, files: &[&str]) {
        let dir = config.category_output_dir(language, bin, category);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), b"audio").unwrap();
        }
    }

    #[test]
    fn symmetric_joins_on_index_prefix() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        audio(&config, Language::English, "Words", "greetings", &["003_Hello.mp3", "004_Bye.mp3"]);
        audio(&config, Language::Korean, "Words", "greetings", &["003_안녕.mp3"]);

        let doc = ManifestBuilder::new(&config).build("Words").unwrap();
        assert_eq!(doc.bin, "Words");
        assert_eq!(doc.categories, vec!["greetings"]);

        let entries = &doc.words["greetings"];
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.index, "003");
        assert_eq!(entry.english, "Hello");
        assert_eq!(entry.korean, "안녕");
        assert_eq!(entry.audio_en, "English/Words/greetings/003_Hello.mp3");
        assert_eq!(entry.audio_ko, "Korean/Words/greetings/003_안녕.mp3");
        assert_eq!(entry.audio_en_name, None);
    }

    #[test]
    fn symmetric_keeps_labels_ending_in_name() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        audio(&config, Language::English, "Words", "forms", &["000_first_name.mp3"]);
        audio(&config, Language::Korean, "Words", "forms", &["000_이름.mp3"]);

        let doc = ManifestBuilder::new(&config).build("Words").unwrap();
        let entries = &doc.words["forms"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].english, "first name");
        assert_eq!(entries[0].audio_en, "English/Words/forms/000_first_name.mp3");
    }

    #[test]
    fn symmetric_keeps_category_without_korean_side_empty() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        audio(&config, Language::English, "Phrases", "travel", &["000_Where_is_it.mp3"]);

        let doc = ManifestBuilder::new(&config).build("Phrases").unwrap();
        assert_eq!(doc.categories, vec!["travel"]);
        assert!(doc.words["travel"].is_empty());
    }

    #[test]
    fn partial_policy_keeps_unmatched_indices() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        audio(&config, Language::English, "Words", "greetings", &["003_Hello.mp3", "004_Bye.mp3"]);
        audio(&config, Language::Korean, "Words", "greetings", &["003_안녕.mp3"]);

        let doc = ManifestBuilder::new(&config)
            .build_with("Words", MatchPolicy::Partial)
            .unwrap();
        let entries = &doc.words["greetings"];
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].index, "004");
        assert_eq!(entries[1].english, "Bye");
        assert_eq!(entries[1].korean, "");
        assert_eq!(entries[1].audio_ko, "");
    }

    #[test]
    fn alphabet_merges_prefixed_directories_and_name_files() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        audio(
            &config,
            Language::Korean,
            "Alphabet",
            "korean_consonants",
            &["000_ㄱ.mp3", "000_ㄱ_name.mp3", "001_ㄴ.mp3"],
        );
        audio(&config, Language::English, "Alphabet", "english_vowels", &["000_A.mp3", "000_A_name.mp3"]);

        let doc = ManifestBuilder::new(&config).build("Alphabet").unwrap();
        assert_eq!(doc.categories, vec!["consonants", "vowels"]);

        let consonants = &doc.words["consonants"];
        assert_eq!(consonants.len(), 2);
        assert_eq!(consonants[0].korean, "ㄱ");
        assert_eq!(consonants[0].english, "");
        assert_eq!(
            consonants[0].audio_ko_name.as_deref(),
            Some("Korean/Alphabet/korean_consonants/000_ㄱ_name.mp3")
        );
        assert_eq!(consonants[1].audio_ko_name.as_deref(), Some(""));
        assert_eq!(consonants[0].audio_en_name.as_deref(), Some(""));

        let vowels = &doc.words["vowels"];
        assert_eq!(vowels[0].english, "A");
        assert_eq!(vowels[0].korean, "");
        assert_eq!(vowels[0].audio_en, "English/Alphabet/english_vowels/000_A.mp3");
    }

    #[test]
    fn alphabet_name_file_follows_its_letter_not_its_index() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        // ㄴ lost its sound recording, so ㄱ reused index 000.
        audio(
            &config,
            Language::Korean,
            "Alphabet",
            "korean_consonants",
            &["000_ㄱ.mp3", "000_ㄱ_name.mp3", "000_ㄴ_name.mp3"],
        );

        let doc = ManifestBuilder::new(&config).build("Alphabet").unwrap();
        let consonants = &doc.words["consonants"];
        assert_eq!(consonants.len(), 1);
        assert_eq!(consonants[0].korean, "ㄱ");
        assert_eq!(
            consonants[0].audio_ko_name.as_deref(),
            Some("Korean/Alphabet/korean_consonants/000_ㄱ_name.mp3")
        );
    }

    #[test]
    fn alphabet_recovers_pronunciation_from_source_text() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        audio(&config, Language::Korean, "Alphabet", "korean_consonants", &["000_ㄱ.mp3", "001_ㄴ.mp3"]);
        let source = config.bin_source_dir("Alphabet");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("korean_consonants.txt"), "ㄱ, g / k\nㄴ n\n").unwrap();

        let doc = ManifestBuilder::new(&config).build("Alphabet").unwrap();
        let consonants = &doc.words["consonants"];
        assert_eq!(consonants[0].english, "g / k");
        assert_eq!(consonants[1].english, "n");
        assert_eq!(consonants[0].audio_en, "");
    }

    #[test]
    fn build_all_writes_one_document_per_bin() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        audio(&config, Language::English, "Words", "animals", &["000_Dog.mp3"]);
        audio(&config, Language::Korean, "Words", "animals", &["000_개.mp3"]);

        let written = ManifestBuilder::new(&config).build_all().unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["alphabet_config.json", "word_config.json", "phrases_config.json"]
        );

        let json = fs::read_to_string(dir.path().join("word_config.json")).unwrap();
        assert!(json.contains("\"korean\": \"개\""));
    }

    #[test]
    fn flat_layout_skips_bin_directories() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        audio(&config, Language::English, "", "animals", &["000_Dog.mp3"]);
        audio(&config, Language::Korean, "", "animals", &["000_개.mp3"]);
        audio(&config, Language::English, "Words", "colors", &[]);

        let doc = ManifestBuilder::new(&config).build("").unwrap();
        assert_eq!(doc.categories, vec!["animals"]);
        assert_eq!(doc.words["animals"][0].audio_en, "English/animals/000_Dog.mp3");
    }

    #[test]
    fn config_without_bins_writes_the_flat_document() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig {
            bins: Vec::new(),
            ..config_in(&dir)
        };
        audio(&config, Language::English, "", "animals", &["000_Dog.mp3"]);
        audio(&config, Language::Korean, "", "animals", &["000_개.mp3"]);

        let written = ManifestBuilder::new(&config).build_all().unwrap();
        assert_eq!(written, vec![dir.path().join("word_config.json")]);

        let json = fs::read_to_string(&written[0]).unwrap();
        assert!(!json.contains("\"bin\""));
        assert!(json.contains("\"audioKo\": \"Korean/animals/000_개.mp3\""));
    }
}
