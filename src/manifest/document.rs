use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::VocabError;

/// One English/Korean pair sharing an index within a category.
///
/// Either side may be empty when its recording is missing. The `_name`
/// fields exist only in alphabet documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub index: String,
    pub english: String,
    pub korean: String,
    pub audio_en: String,
    pub audio_ko: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_en_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_ko_name: Option<String>,
}

impl CategoryEntry {
    /// An entry with every field empty, name fields included.
    pub fn blank(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            audio_en_name: Some(String::new()),
            audio_ko_name: Some(String::new()),
            ..Default::default()
        }
    }
}

/// The JSON index for one bin, rebuilt from disk on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Omitted for the flat layout.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bin: String,
    pub categories: Vec<String>,
    pub words: BTreeMap<String, Vec<CategoryEntry>>,
}

impl ConfigDocument {
    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            ..Default::default()
        }
    }

    pub fn total_entries(&self) -> usize {
        self.words.values().map(Vec::len).sum()
    }

    /// Two-space indented JSON with non-ASCII text kept literal.
    pub fn to_json(&self) -> Result<String, VocabError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`, replacing any previous version atomically.
    pub fn write_to(&self, path: &Path) -> Result<(), VocabError> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| VocabError::directory(parent, e))?;

        let json = self.to_json()?;
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(path).map_err(|e| VocabError::Io(e.error))?;
        Ok(())
    }
}
