//! Vocabulary line parsing.
//!
//! A line holds one pair in one of these shapes:
//!
//! ```text
//! 안녕하세요 → annyeonghaseyo → Hello     arrow-delimited
//! 안녕하세요, Hello                       comma-delimited
//! 안녕하세요,Hello                        comma-delimited, no spaces
//! 안녕하세요 Hello                        space-delimited
//! ```
//!
//! The first delimiter present picks the strategy: a line containing an arrow
//! is only split on arrows, otherwise a line containing a comma is only split
//! on commas, otherwise the space fallback for the current [`ParseMode`] runs.

use crate::VocabError;

pub const ARROW: char = '→';

/// Which fields a line is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// `korean english`; space fallback splits at the end of the Hangul run.
    Pair,
    /// `korean romanization english`; space fallback splits on whitespace.
    Romanized,
    /// `character pronunciation`; space fallback takes the first token as the character.
    Letter,
}

impl ParseMode {
    fn field_count(self) -> usize {
        match self {
            ParseMode::Pair | ParseMode::Letter => 2,
            ParseMode::Romanized => 3,
        }
    }
}

/// A successfully parsed line. Both text fields are non-empty and trimmed.
///
/// In [`ParseMode::Letter`], `primary` is the character and `secondary` its
/// pronunciation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPair {
    pub primary: String,
    pub secondary: String,
    pub romanization: Option<String>,
}

impl ParsedPair {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            romanization: None,
        }
    }

    pub fn character(&self) -> &str {
        &self.primary
    }

    pub fn pronunciation(&self) -> &str {
        &self.secondary
    }

    fn from_fields(mut fields: Vec<String>) -> Self {
        match fields.len() {
            3 => {
                let secondary = fields.pop().unwrap_or_default();
                let romanization = fields.pop();
                let primary = fields.pop().unwrap_or_default();
                Self {
                    primary,
                    secondary,
                    romanization,
                }
            }
            _ => {
                let secondary = fields.pop().unwrap_or_default();
                let primary = fields.pop().unwrap_or_default();
                Self::new(primary, secondary)
            }
        }
    }
}

/// One raw line of an input file, numbered from 1.
#[derive(Debug, Clone, Copy)]
pub struct VocabLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl<'a> VocabLine<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    /// Number every line of `content` starting at 1.
    pub fn enumerate(content: &'a str) -> impl Iterator<Item = VocabLine<'a>> {
        content
            .lines()
            .enumerate()
            .map(|(i, text)| VocabLine::new(i + 1, text))
    }

    /// Parse the line.
    ///
    /// Returns `Ok(None)` for blank lines and [`VocabError::Unparseable`] when
    /// no strategy yields every required field.
    pub fn parse(&self, mode: ParseMode) -> Result<Option<ParsedPair>, VocabError> {
        let line = self.text.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let fields = if line.contains(ARROW) {
            split_delimited(line, ARROW, mode.field_count())
        } else if line.contains(',') {
            split_delimited(line, ',', mode.field_count())
        } else {
            match mode {
                ParseMode::Pair => split_script_boundary(line),
                ParseMode::Romanized => split_tokens(line, 3),
                ParseMode::Letter => split_tokens(line, 2),
            }
        };

        fields.map(ParsedPair::from_fields).map(Some).ok_or_else(|| {
            VocabError::Unparseable {
                line: self.number,
                text: line.to_string(),
            }
        })
    }
}

fn split_delimited(line: &str, delimiter: char, count: usize) -> Option<Vec<String>> {
    let parts: Vec<&str> = line.split(delimiter).map(str::trim).collect();
    if parts.len() < count {
        return None;
    }
    let fields: Vec<String> = parts[..count].iter().map(|p| p.to_string()).collect();
    if fields.iter().any(String::is_empty) {
        return None;
    }
    Some(fields)
}

/// First token(s) up to `count - 1`, then the remaining tokens joined by single spaces.
fn split_tokens(line: &str, count: usize) -> Option<Vec<String>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < count {
        return None;
    }
    let mut fields: Vec<String> = tokens[..count - 1].iter().map(|t| t.to_string()).collect();
    fields.push(tokens[count - 1..].join(" "));
    Some(fields)
}

fn split_script_boundary(line: &str) -> Option<Vec<String>> {
    let boundary = line
        .char_indices()
        .find(|&(_, ch)| !is_primary_char(ch))
        .map(|(idx, _)| idx)
        .unwrap_or(line.len());

    if boundary == 0 {
        return None;
    }

    let primary = line[..boundary].trim();
    let secondary = line[boundary..].trim();
    if primary.is_empty() || secondary.is_empty() {
        return None;
    }
    Some(vec![primary.to_string(), secondary.to_string()])
}

/// Characters that may appear in the Korean half of a space-delimited pair.
fn is_primary_char(ch: char) -> bool {
    is_hangul_syllable(ch) || ch.is_whitespace() || matches!(ch, '.' | ',' | '?' | '!')
}

pub fn is_hangul_syllable(ch: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&ch)
}
