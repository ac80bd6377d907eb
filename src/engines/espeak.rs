//! espeak-ng speech backend.
//!
//! Runs the `espeak-ng` binary once per utterance and captures the WAV it
//! writes to stdout. The output is checked with `hound` before it is handed
//! back, so an empty or truncated recording counts as a synthesis failure.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use vocab_tts::{engines::espeak::EspeakSynthesizer, Language, Synthesizer};
//!
//! // Uses system espeak-ng from PATH
//! let mut synth = EspeakSynthesizer::new();
//! let wav = synth.synthesize("안녕하세요", Language::Korean, true)?;
//!
//! // Bundled binary and data directory
//! let bundled = EspeakSynthesizer::with_paths(
//!     Some(PathBuf::from("/app/resources/espeak-ng/espeak-ng")),
//!     Some(PathBuf::from("/app/resources/espeak-ng-data")),
//! );
//! # Ok::<(), vocab_tts::VocabError>(())
//! ```

use std::borrow::Cow;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::{Language, Synthesizer, VocabError};

/// Words per minute for normal speech.
pub const NORMAL_RATE: u32 = 160;
/// Words per minute for slow speech.
pub const SLOW_RATE: u32 = 110;

/// Location of the espeak-ng binary and its voice data.
#[derive(Debug, Clone, Default)]
pub struct EspeakConfig {
    /// `None` runs `espeak-ng` from PATH.
    pub bin_path: Option<PathBuf>,
    /// `None` lets espeak-ng use its compiled-in data directory.
    pub data_path: Option<PathBuf>,
}

impl EspeakConfig {
    fn command(&self) -> Command {
        let mut cmd = match &self.bin_path {
            Some(bin) => Command::new(bin),
            None => Command::new("espeak-ng"),
        };
        if let Some(data) = &self.data_path {
            cmd.arg("--path").arg(data);
        }
        cmd
    }
}

/// [`Synthesizer`] backed by the espeak-ng command line tool.
#[derive(Debug, Clone)]
pub struct EspeakSynthesizer {
    espeak: EspeakConfig,
    normal_rate: u32,
    slow_rate: u32,
}

impl Default for EspeakSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EspeakSynthesizer {
    /// Create a synthesizer that uses `espeak-ng` from PATH.
    pub fn new() -> Self {
        Self::with_config(EspeakConfig::default())
    }

    /// Create a synthesizer with explicit espeak-ng binary and data paths.
    ///
    /// Either path can be `None` to fall back to the system default.
    pub fn with_paths(bin_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Self {
        Self::with_config(EspeakConfig {
            bin_path,
            data_path,
        })
    }

    pub fn with_config(espeak: EspeakConfig) -> Self {
        Self {
            espeak,
            normal_rate: NORMAL_RATE,
            slow_rate: SLOW_RATE,
        }
    }

    /// Override the speaking rates, in words per minute.
    pub fn with_rates(mut self, normal: u32, slow: u32) -> Self {
        self.normal_rate = normal;
        self.slow_rate = slow;
        self
    }

    fn rate(&self, slow: bool) -> u32 {
        if slow {
            self.slow_rate
        } else {
            self.normal_rate
        }
    }
}

/// espeak-ng voice for a language.
pub fn voice(language: Language) -> &'static str {
    match language {
        Language::Korean => "ko",
        Language::English => "en-us",
    }
}

impl Synthesizer for EspeakSynthesizer {
    fn synthesize(
        &mut self,
        text: &str,
        language: Language,
        slow: bool,
    ) -> Result<Vec<u8>, VocabError> {
        let rate = self.rate(slow);
        let mut child = self
            .espeak
            .command()
            .args(["--stdout", "--stdin", "-q", "-v", voice(language)])
            .arg("-s")
            .arg(rate.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VocabError::Synthesis(
                        "espeak-ng not found. Install it or configure its path".to_string(),
                    )
                } else {
                    VocabError::Synthesis(format!("failed to start espeak-ng: {e}"))
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // Line-oriented input: the last token is dropped without a terminator.
            let payload = canonicalize_stdin_payload(text);
            stdin
                .write_all(payload.as_bytes())
                .map_err(|e| VocabError::Synthesis(format!("failed to write to espeak-ng: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| VocabError::Synthesis(format!("espeak-ng did not finish: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VocabError::Synthesis(format!(
                "espeak-ng exited with code {:?}: {stderr}",
                output.status.code()
            )));
        }

        let duration = validate_wav(&output.stdout)?;
        log::debug!(
            "Synthesized {:.2}s of {} audio at {rate} wpm",
            duration,
            language.code()
        );
        Ok(output.stdout)
    }
}

fn canonicalize_stdin_payload(input: &str) -> Cow<'_, str> {
    if input.ends_with('\n') {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("{input}\n"))
    }
}

/// Parse `bytes` as WAV and return its duration in seconds.
///
/// Samples are counted rather than taken from the header: when streaming to
/// stdout espeak-ng cannot seek back to fill in the data length.
fn validate_wav(bytes: &[u8]) -> Result<f32, VocabError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| VocabError::Synthesis(format!("espeak-ng produced invalid audio: {e}")))?;
    let spec = reader.spec();
    let samples = reader
        .samples::<i16>()
        .take_while(Result::is_ok)
        .count();
    let frames = samples / usize::from(spec.channels.max(1));
    if frames == 0 {
        return Err(VocabError::Synthesis(
            "espeak-ng produced empty audio".to_string(),
        ));
    }
    Ok(frames as f32 / spec.sample_rate as f32)
}
