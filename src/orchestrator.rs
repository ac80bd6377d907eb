//! Batch driver: discovers input files across bins and processes them one by one.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use walkdir::WalkDir;

use crate::processor::{CategoryFile, CategoryProcessor, CategoryReport};
use crate::{GeneratorConfig, Language, Synthesizer, VocabError};

const SOURCE_EXTENSION: &str = "txt";

/// Aggregated results of one generator run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub categories: Vec<CategoryReport>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total_generated(&self, language: Language) -> usize {
        self.categories
            .iter()
            .map(|c| c.tally(language).generated.len())
            .sum()
    }

    pub fn total_failed(&self, language: Language) -> usize {
        self.categories
            .iter()
            .map(|c| c.tally(language).failed.len())
            .sum()
    }

    /// Category reports grouped by bin name.
    pub fn by_bin(&self) -> BTreeMap<&str, Vec<&CategoryReport>> {
        let mut bins: BTreeMap<&str, Vec<&CategoryReport>> = BTreeMap::new();
        for report in &self.categories {
            bins.entry(report.bin.as_str()).or_default().push(report);
        }
        bins
    }

    /// Categories whose processing stopped early.
    pub fn aborted(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories.iter().filter(|c| c.aborted.is_some())
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for language in Language::ALL {
            writeln!(
                f,
                "Total {language} files generated: {}",
                self.total_generated(language)
            )?;
        }
        for language in Language::ALL {
            writeln!(
                f,
                "Total {language} files failed: {}",
                self.total_failed(language)
            )?;
        }
        writeln!(
            f,
            "Total processing time: {:.1} seconds",
            self.elapsed.as_secs_f64()
        )?;

        for (bin, reports) in self.by_bin() {
            if !bin.is_empty() {
                writeln!(f, "\nBin: {bin}")?;
            }
            for report in reports {
                writeln!(f, "\nCategory: {}", report.category)?;
                for language in Language::ALL {
                    writeln!(
                        f,
                        "  {language} success: {}",
                        report.tally(language).generated.len()
                    )?;
                }
                if let Some(reason) = &report.aborted {
                    writeln!(f, "  Aborted: {reason}")?;
                }
                if report.korean.failed.is_empty() && report.english.failed.is_empty() {
                    continue;
                }
                writeln!(f, "  Failed items:")?;
                for language in Language::ALL {
                    let failed = &report.tally(language).failed;
                    if failed.is_empty() {
                        continue;
                    }
                    writeln!(f, "    {language}:")?;
                    for item in failed {
                        writeln!(f, "    - {item}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Runs every discovered category file through a [`CategoryProcessor`].
pub struct BinOrchestrator<'a, S> {
    config: &'a GeneratorConfig,
    synth: S,
}

impl<'a, S: Synthesizer> BinOrchestrator<'a, S> {
    pub fn new(config: &'a GeneratorConfig, synth: S) -> Self {
        Self { config, synth }
    }

    pub fn synthesizer(&self) -> &S {
        &self.synth
    }

    /// Create `{Korean,English}/{bin}` for every known bin.
    pub fn prepare_skeleton(&self) -> Result<(), VocabError> {
        for bin in &self.config.bins {
            for language in Language::ALL {
                let dir = self.config.bin_output_dir(language, bin);
                std::fs::create_dir_all(&dir).map_err(|e| VocabError::directory(&dir, e))?;
            }
        }
        Ok(())
    }

    /// Find the `.txt` files to process, sorted by path.
    ///
    /// Files directly under the categories root belong to the flat (empty)
    /// bin; files one level down belong to the bin named by their folder.
    pub fn discover(&self) -> Result<Vec<CategoryFile>, VocabError> {
        let root = &self.config.categories_root;
        if !root.is_dir() {
            std::fs::create_dir_all(root).map_err(|e| VocabError::directory(root, e))?;
            log::warn!(
                "Created categories directory {}. Add vocabulary files to it and run again.",
                root.display()
            );
            return Ok(Vec::new());
        }

        let (walk_root, max_depth) = match &self.config.target_bin {
            Some(bin) => (root.join(bin), 1),
            None => (root.clone(), 2),
        };
        if !walk_root.is_dir() {
            log::warn!("Bin directory {} not found", walk_root.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&walk_root).min_depth(1).max_depth(max_depth) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Error accessing entry: {e}");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !crate::sequence::has_extension(path, SOURCE_EXTENSION)
            {
                continue;
            }
            files.push(CategoryFile::new(path, bin_of(root, path)));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        log::debug!("Discovered {} category files", files.len());
        Ok(files)
    }

    /// Process every discovered file. Per-file errors end up in the report;
    /// only skeleton creation and discovery errors fail the batch.
    pub fn run(&mut self) -> Result<BatchReport, VocabError> {
        let start = Instant::now();
        self.prepare_skeleton()?;
        let files = self.discover()?;
        if files.is_empty() {
            log::warn!(
                "No text files found in {}",
                self.config.categories_root.display()
            );
        }

        let mut processor = CategoryProcessor::new(self.config, &mut self.synth);
        let categories = files.iter().map(|file| processor.process(file)).collect();

        let report = BatchReport {
            categories,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Batch finished in {:.1?}: {} Korean / {} English files generated",
            report.elapsed,
            report.total_generated(Language::Korean),
            report.total_generated(Language::English)
        );
        Ok(report)
    }
}

/// First path segment below `root` when the file is nested, else empty.
fn bin_of(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut components = relative.components();
    match (components.next(), components.next()) {
        (Some(bin), Some(_)) => bin.as_os_str().to_string_lossy().into_owned(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{bin_of, BatchReport, BinOrchestrator};
    use crate::testing::{init_logging, FakeSynth};
    use crate::{GeneratorConfig, Language};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> GeneratorConfig {
        GeneratorConfig::builder()
            .categories_root(dir.path().join("Categories"))
            .output_root(dir.path().to_path_buf())
            .build()
            .unwrap()
    }

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join("Categories").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn bin_is_first_nested_segment() {
        let root = Path::new("Categories");
        assert_eq!(bin_of(root, Path::new("Categories/Words/animals.txt")), "Words");
        assert_eq!(bin_of(root, Path::new("Categories/animals.txt")), "");
    }

    #[test]
    fn creates_skeleton_for_every_bin() {
        init_logging();
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let mut orchestrator = BinOrchestrator::new(&config, FakeSynth::default());
        orchestrator.run().unwrap();

        for bin in ["Alphabet", "Words", "Phrases"] {
            assert!(dir.path().join("Korean").join(bin).is_dir());
            assert!(dir.path().join("English").join(bin).is_dir());
        }
        // A missing categories root is created for the next run.
        assert!(dir.path().join("Categories").is_dir());
    }

    #[test]
    fn discovers_nested_and_flat_text_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Words/animals.txt", "");
        write(&dir, "Phrases/greetings.txt", "");
        write(&dir, "legacy.txt", "");
        write(&dir, "Words/notes.md", "");
        write(&dir, "Words/deep/ignored.txt", "");

        let config = config_in(&dir);
        let orchestrator = BinOrchestrator::new(&config, FakeSynth::default());
        let found: Vec<(String, String)> = orchestrator
            .discover()
            .unwrap()
            .into_iter()
            .map(|f| (f.bin, f.category))
            .collect();

        assert_eq!(
            found,
            vec![
                ("Phrases".to_string(), "greetings".to_string()),
                ("Words".to_string(), "animals".to_string()),
                (String::new(), "legacy".to_string()),
            ]
        );
    }

    #[test]
    fn target_bin_restricts_discovery() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Words/animals.txt", "");
        write(&dir, "Phrases/greetings.txt", "");

        let config = GeneratorConfig {
            target_bin: Some("Phrases".to_string()),
            ..config_in(&dir)
        };
        let orchestrator = BinOrchestrator::new(&config, FakeSynth::default());
        let found = orchestrator.discover().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].bin, "Phrases");
    }

    #[test]
    fn aggregates_results_across_files() {
        init_logging();
        let dir = TempDir::new().unwrap();
        write(&dir, "Words/animals.txt", "개, Dog\n고양이, Cat\n");
        write(&dir, "Phrases/greetings.txt", "안녕하세요, Hello\nbroken\n");

        let config = config_in(&dir);
        let mut orchestrator = BinOrchestrator::new(&config, FakeSynth::failing_on(&["Cat"]));
        let report = orchestrator.run().unwrap();

        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.total_generated(Language::Korean), 3);
        assert_eq!(report.total_generated(Language::English), 2);
        assert_eq!(report.total_failed(Language::Korean), 1);
        assert_eq!(report.total_failed(Language::English), 2);
        assert_eq!(report.by_bin().len(), 2);
        assert_eq!(report.aborted().count(), 0);

        let summary = report.to_string();
        assert!(summary.contains("Total Korean files generated: 3"));
        assert!(summary.contains("Category: animals"));
        assert!(summary.contains("    - Cat"));
        assert!(summary.contains("Line 2: 'broken' could not be parsed"));
    }

    #[test]
    fn one_failing_file_does_not_stop_the_batch() {
        init_logging();
        let dir = TempDir::new().unwrap();
        write(&dir, "Words/animals.txt", "개, Dog\n");
        write(&dir, "Words/colors.txt", "빨강, Red\n");
        // A file where the category directory should be makes directory creation fail.
        fs::create_dir_all(dir.path().join("Korean/Words")).unwrap();
        fs::write(dir.path().join("Korean/Words/animals"), b"not a dir").unwrap();

        let config = config_in(&dir);
        let mut orchestrator = BinOrchestrator::new(&config, FakeSynth::default());
        let report = orchestrator.run().unwrap();

        assert_eq!(report.aborted().count(), 1);
        let colors = report
            .categories
            .iter()
            .find(|c| c.category == "colors")
            .unwrap();
        assert_eq!(colors.english.generated, vec!["000_Red"]);
    }

    #[test]
    fn empty_report_summary() {
        let summary = BatchReport::default().to_string();
        assert!(summary.contains("Total English files failed: 0"));
    }
}
