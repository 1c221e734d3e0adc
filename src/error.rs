//! Error taxonomy for the extraction and summarization pipeline.
//!
//! Extractors fail with [`ExtractionError`], the summarizer with
//! [`SummarizationError`]. A short input is *not* an error; it is reported
//! as [`SummaryResult::TooShort`](crate::models::SummaryResult::TooShort).

use thiserror::Error;

/// Failure while turning a URL or PDF into plain text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// DNS, connect, timeout, or a URL the HTTP client refused to send.
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered, but not with a 2xx status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The response body could not be read or decoded as HTML.
    #[error("failed to parse page from {url}: {message}")]
    Parse { url: String, message: String },

    /// The PDF is corrupt, encrypted, or not a PDF at all.
    #[error("unreadable PDF document: {0}")]
    DocumentFormat(String),
}

impl ExtractionError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::Network { .. } => "network_error",
            ExtractionError::HttpStatus { .. } => "http_status_error",
            ExtractionError::Parse { .. } => "parse_error",
            ExtractionError::DocumentFormat(_) => "document_format_error",
        }
    }
}

/// Failure while asking the model for a summary.
#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("summarization model '{model}' failed: {message}")]
    ModelInvocation { model: String, message: String },

    #[error("input is {chars} characters, above the configured limit of {limit}")]
    InputTooLong { chars: usize, limit: usize },
}

impl SummarizationError {
    pub(crate) fn invocation(model: &str, message: impl Into<String>) -> Self {
        SummarizationError::ModelInvocation {
            model: model.to_string(),
            message: message.into(),
        }
    }
}

/// A requested summary length outside the allowed range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("summary length {value} is out of range; must be between {min} and {max}")]
pub struct LengthError {
    pub value: u32,
    pub min: u32,
    pub max: u32,
}

/// Any failure of a single pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Summarization(#[from] SummarizationError),
}
