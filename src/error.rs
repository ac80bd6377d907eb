use std::path::PathBuf;

/// Errors raised while turning vocabulary lists into audio assets.
///
/// `Unparseable` and `Synthesis` are recovered per line: they are logged,
/// collected into the category report and processing moves on. Every other
/// variant aborts the file or category currently being handled.
#[derive(thiserror::Error, Debug)]
pub enum VocabError {
    #[error("Line {line}: '{text}' could not be parsed")]
    Unparseable { line: usize, text: String },
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("Cannot prepare directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl VocabError {
    /// Whether processing of the current file may continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VocabError::Unparseable { .. } | VocabError::Synthesis(_))
    }

    pub(crate) fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VocabError::Directory {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VocabError::FileRead {
            path: path.into(),
            source,
        }
    }
}
