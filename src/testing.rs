//! In-memory synthesizer used by unit tests.

use std::collections::HashSet;

use crate::{Language, Synthesizer, VocabError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthCall {
    pub text: String,
    pub language: Language,
    pub slow: bool,
}

/// Returns `"{code}:{text}"` as audio. Texts in `failing` get a synthesis
/// error, texts in `broken` an I/O error.
#[derive(Debug, Default)]
pub struct FakeSynth {
    pub calls: Vec<SynthCall>,
    pub failing: HashSet<String>,
    pub broken: HashSet<String>,
}

impl FakeSynth {
    pub fn failing_on(texts: &[&str]) -> Self {
        Self {
            failing: texts.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn broken_on(texts: &[&str]) -> Self {
        Self {
            broken: texts.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn call_for(&self, text: &str, language: Language) -> Option<&SynthCall> {
        self.calls
            .iter()
            .find(|c| c.text == text && c.language == language)
    }
}

impl Synthesizer for FakeSynth {
    fn synthesize(
        &mut self,
        text: &str,
        language: Language,
        slow: bool,
    ) -> Result<Vec<u8>, VocabError> {
        self.calls.push(SynthCall {
            text: text.to_string(),
            language,
            slow,
        });
        if self.broken.contains(text) {
            return Err(VocabError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "disk unavailable",
            )));
        }
        if self.failing.contains(text) {
            return Err(VocabError::Synthesis(format!("provider rejected {text:?}")));
        }
        Ok(format!("{}:{text}", language.code()).into_bytes())
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
