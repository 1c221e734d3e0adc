//! Core data models used throughout the summarizer.
//!
//! These are transient, request-scoped values: a [`RawInput`] comes in from a
//! shell, is turned into extracted text, and leaves as a [`SummaryResult`].
//! Nothing here is persisted or mutated after construction.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::LengthError;

/// Texts shorter than this many characters are never sent to the model.
pub const MIN_INPUT_CHARS: usize = 50;

/// Minimum summary length requested from the model, in model tokens.
pub const MIN_SUMMARY_LENGTH: u32 = 50;

/// Largest maximum summary length an operator may request.
pub const MAX_SUMMARY_LENGTH: u32 = 300;

/// Maximum summary length used when the operator does not pick one.
pub const DEFAULT_SUMMARY_LENGTH: u32 = 150;

/// Rendered in place of a summary when the input is too short.
pub const TOO_SHORT_MESSAGE: &str = "Text too short for summarization.";

/// The source selected by the operator for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    PlainText,
    Url,
    Document,
}

impl FromStr for InputKind {
    type Err = String;

    /// Accepts the short tags used by the CLI and web form (`text`, `url`,
    /// `pdf`) as well as the longer UI labels (`"PDF Upload"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" | "plain_text" => Ok(InputKind::PlainText),
            "url" => Ok(InputKind::Url),
            "pdf" | "pdf upload" | "document" => Ok(InputKind::Document),
            other => Err(format!(
                "unknown input kind: '{}'. Must be text, url, or pdf.",
                other
            )),
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            InputKind::PlainText => "text",
            InputKind::Url => "url",
            InputKind::Document => "pdf",
        };
        f.write_str(tag)
    }
}

/// Raw operator input. Exactly one variant is populated per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// Text pasted directly by the operator; used as-is.
    PlainText(String),
    /// Address of a web article to fetch.
    Url(String),
    /// Bytes of an uploaded PDF document.
    Document(Vec<u8>),
}

impl RawInput {
    pub fn kind(&self) -> InputKind {
        match self {
            RawInput::PlainText(_) => InputKind::PlainText,
            RawInput::Url(_) => InputKind::Url,
            RawInput::Document(_) => InputKind::Document,
        }
    }
}

/// Maximum summary length, guaranteed to lie in
/// `[MIN_SUMMARY_LENGTH, MAX_SUMMARY_LENGTH]`.
///
/// Out-of-range values are rejected rather than clamped, so the model never
/// sees a maximum below its minimum output length.
///
/// ```rust
/// use content_summarizer::models::SummaryLength;
///
/// assert_eq!(SummaryLength::default().get(), 150);
/// assert!(SummaryLength::new(49).is_err());
/// assert!(SummaryLength::new(300).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SummaryLength(u32);

impl SummaryLength {
    pub fn new(value: u32) -> Result<Self, LengthError> {
        if !(MIN_SUMMARY_LENGTH..=MAX_SUMMARY_LENGTH).contains(&value) {
            return Err(LengthError {
                value,
                min: MIN_SUMMARY_LENGTH,
                max: MAX_SUMMARY_LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SummaryLength {
    fn default() -> Self {
        Self(DEFAULT_SUMMARY_LENGTH)
    }
}

impl FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid summary length: '{}'", s))?;
        SummaryLength::new(value).map_err(|e| e.to_string())
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extracted text paired with the requested maximum summary length.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub text: String,
    pub max_length: SummaryLength,
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>, max_length: SummaryLength) -> Self {
        Self {
            text: text.into(),
            max_length,
        }
    }

    /// Input length in characters (Unicode scalar values), the unit the
    /// minimum-input guard and the oversize limit are expressed in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Outcome of a successful summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResult {
    Summary(String),
    /// The input was below [`MIN_INPUT_CHARS`]; the model was not invoked.
    TooShort,
}

impl SummaryResult {
    pub fn is_too_short(&self) -> bool {
        matches!(self, SummaryResult::TooShort)
    }
}

impl fmt::Display for SummaryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryResult::Summary(text) => f.write_str(text),
            SummaryResult::TooShort => f.write_str(TOO_SHORT_MESSAGE),
        }
    }
}
