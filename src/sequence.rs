//! Next-index allocation for numbered audio directories.
//!
//! Audio files are named `NNN_label.ext`. Re-running the generator against a
//! populated directory continues numbering after the highest `NNN` found, so
//! earlier files are never overwritten.

use std::path::Path;

use crate::VocabError;

/// Highest index a three-digit prefix can carry.
pub const MAX_INDEX: u32 = 999;

/// The three-digit index prefix of `file_name`, if it has one.
pub fn index_prefix(file_name: &str) -> Option<&str> {
    let prefix = file_name.get(..3)?;
    if prefix.bytes().all(|b| b.is_ascii_digit()) {
        Some(prefix)
    } else {
        None
    }
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// File names in `dir` carrying `extension`, sorted. A missing directory is empty.
pub fn list_audio_files(dir: &Path, extension: &str) -> Result<Vec<String>, VocabError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| VocabError::directory(dir, e))? {
        let entry = entry.map_err(|e| VocabError::directory(dir, e))?;
        let path = entry.path();
        if !path.is_file() || !has_extension(&path, extension) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Index the next audio file written to `dir` should take.
///
/// Returns `max(existing indices) + 1`, or `0` when no file carries a numeric
/// prefix. Files with malformed prefixes are ignored.
pub fn next_index(dir: &Path, extension: &str) -> Result<u32, VocabError> {
    let next = list_audio_files(dir, extension)?
        .iter()
        .filter_map(|name| index_prefix(name))
        .filter_map(|prefix| prefix.parse::<u32>().ok())
        .max()
        .map(|max| max + 1)
        .unwrap_or(0);
    if next > MAX_INDEX {
        log::warn!(
            "{} is full: index {next} does not fit the three-digit join key, \
             existing files may be overwritten",
            dir.display()
        );
    }
    Ok(next)
}

/// Remove every audio file in `dir`, returning how many were deleted.
///
/// Workflows that always restart numbering at `000` must call this first,
/// otherwise new files collide with stale ones.
pub fn clear_audio(dir: &Path, extension: &str) -> Result<usize, VocabError> {
    let files = list_audio_files(dir, extension)?;
    for name in &files {
        let path = dir.join(name);
        std::fs::remove_file(&path).map_err(|e| VocabError::directory(&path, e))?;
    }
    if !files.is_empty() {
        log::info!("Cleared {} audio files from {}", files.len(), dir.display());
    }
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::{clear_audio, index_prefix, list_audio_files, next_index, MAX_INDEX};
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), b"audio").unwrap();
    }

    #[test]
    fn continues_after_highest_index() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "002_foo.mp3");
        touch(&dir, "000_bar.mp3");
        touch(&dir, "abc_bad.mp3");
        assert_eq!(next_index(dir.path(), "mp3").unwrap(), 3);
    }

    #[test]
    fn full_directory_reports_index_past_the_key_range() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "999_last.mp3");
        touch(&dir, "1000_overflow.mp3");
        assert_eq!(next_index(dir.path(), "mp3").unwrap(), MAX_INDEX + 1);
    }

    #[test]
    fn empty_or_missing_directory_starts_at_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_index(dir.path(), "mp3").unwrap(), 0);
        assert_eq!(next_index(&dir.path().join("missing"), "mp3").unwrap(), 0);
    }

    #[test]
    fn ignores_other_extensions_and_short_names() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "009_notes.txt");
        touch(&dir, "01.mp3");
        touch(&dir, "004_Dog.MP3");
        assert_eq!(next_index(dir.path(), "mp3").unwrap(), 5);
    }

    #[test]
    fn index_prefix_requires_three_digits() {
        assert_eq!(index_prefix("007_New_York.mp3"), Some("007"));
        assert_eq!(index_prefix("12"), None);
        assert_eq!(index_prefix("1a2_x.mp3"), None);
        assert_eq!(index_prefix("가나다_x.mp3"), None);
    }

    #[test]
    fn clear_removes_only_audio_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "000_a.mp3");
        touch(&dir, "001_b_name.mp3");
        touch(&dir, "keep.txt");

        assert_eq!(clear_audio(dir.path(), "mp3").unwrap(), 2);
        assert!(list_audio_files(dir.path(), "mp3").unwrap().is_empty());
        assert!(dir.path().join("keep.txt").exists());
        assert_eq!(next_index(dir.path(), "mp3").unwrap(), 0);
    }
}
