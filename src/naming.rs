//! Deterministic, filesystem-safe audio file names.

use std::path::Path;

use crate::sequence::index_prefix;
use crate::Language;

/// Characters stripped from labels: those illegal in file names on common
/// filesystems, plus `!`.
const ILLEGAL_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|', '!'];

/// Suffix marking the "letter name" recording of an alphabet asset.
pub const NAME_SUFFIX: &str = "_name";

/// Remove characters that are illegal in file names.
pub fn clean_label(label: &str) -> String {
    label.chars().filter(|c| !ILLEGAL_CHARS.contains(c)).collect()
}

/// Recover the human label from an audio file name.
///
/// Strips the extension, the leading `NNN_` index and replaces underscores
/// with spaces. This does not invert [`clean_label`]: stripped characters and
/// original underscores are lost.
///
/// ```
/// assert_eq!(vocab_tts::naming::extract_label("007_New_York.mp3"), "New York");
/// ```
pub fn extract_label(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let label = match (index_prefix(stem), stem.get(3..4)) {
        (Some(_), Some("_")) if stem.len() > 4 => &stem[4..],
        _ => stem,
    };
    label.replace('_', " ")
}

/// Builds `{index:03}_{label}[_name].{ext}` file names.
#[derive(Debug, Clone)]
pub struct AssetNamer {
    extension: String,
}

impl Default for AssetNamer {
    fn default() -> Self {
        Self::new("mp3")
    }
}

impl AssetNamer {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name for `label` at `index`; `name_variant` appends `_name`.
    pub fn name(&self, index: u32, label: &str, name_variant: bool) -> String {
        format!(
            "{}.{}",
            stem(index, &clean_label(label), name_variant),
            self.extension
        )
    }

    /// Whether `file_name` is the `_name` recording of an alphabet asset.
    pub fn is_name_variant(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.ends_with(NAME_SUFFIX))
            .unwrap_or(false)
    }

    /// File name of the `_name` recording that belongs with `sound_file`.
    pub fn name_variant_of(&self, sound_file: &str) -> String {
        let stem = Path::new(sound_file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(sound_file);
        format!("{stem}{NAME_SUFFIX}.{}", self.extension)
    }
}

fn stem(index: u32, cleaned: &str, name_variant: bool) -> String {
    if name_variant {
        format!("{index:03}_{cleaned}{NAME_SUFFIX}")
    } else {
        format!("{index:03}_{cleaned}")
    }
}

/// One generated audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    pub index: u32,
    pub label: String,
    pub language: Language,
    pub is_name_variant: bool,
}

impl AudioAsset {
    pub fn new(index: u32, label: &str, language: Language, is_name_variant: bool) -> Self {
        Self {
            index,
            label: clean_label(label),
            language,
            is_name_variant,
        }
    }

    /// Name without extension, as recorded in category reports.
    pub fn stem(&self) -> String {
        stem(self.index, &self.label, self.is_name_variant)
    }

    pub fn file_name(&self, namer: &AssetNamer) -> String {
        format!("{}.{}", self.stem(), namer.extension())
    }
}
