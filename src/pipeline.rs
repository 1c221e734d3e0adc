//! The text-acquisition and summarization pipeline.
//!
//! One [`RawInput`] in, one [`SummaryResult`] (or one error) out:
//!
//! ```text
//! RawInput ──▶ extract ──▶ Summarizer ──▶ SummaryResult
//!   text        (as-is)
//!   url         WebExtractor
//!   pdf         extract_pdf_text (blocking pool)
//! ```
//!
//! The pipeline holds only shared, stateless collaborators, so a single
//! instance serves every request of the CLI or the web UI.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::error::{ExtractionError, PipelineError};
use crate::extract::{extract_pdf_text, WebExtractor};
use crate::models::{RawInput, SummaryLength, SummaryRequest, SummaryResult};
use crate::summarizer::Summarizer;

pub struct Pipeline {
    web: WebExtractor,
    summarizer: Summarizer,
}

impl Pipeline {
    pub fn new(web: WebExtractor, summarizer: Summarizer) -> Self {
        Self { web, summarizer }
    }

    /// Build the extractors and the configured model binding.
    pub fn from_config(config: &Config) -> Result<Self> {
        let web = WebExtractor::new(&config.fetch)?;
        let summarizer = Summarizer::from_config(&config.summarizer)?;
        Ok(Self::new(web, summarizer))
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Turn `input` into plain text.
    ///
    /// Plain text is returned unchanged; URLs and PDFs go through their
    /// extractor. An empty result is not an error.
    pub async fn extract(&self, input: RawInput) -> Result<String, ExtractionError> {
        match input {
            RawInput::PlainText(text) => Ok(text),
            RawInput::Url(url) => self.web.extract(url.trim()).await,
            RawInput::Document(bytes) => {
                tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
                    .await
                    .map_err(|e| {
                        ExtractionError::DocumentFormat(format!("extraction task failed: {}", e))
                    })?
            }
        }
    }

    /// Extract and summarize `input`.
    ///
    /// A failed extraction aborts the request before the summarizer is
    /// called; partial output is never summarized.
    pub async fn run(
        &self,
        input: RawInput,
        max_length: SummaryLength,
    ) -> Result<SummaryResult, PipelineError> {
        let kind = input.kind();
        let text = self.extract(input).await?;
        info!(%kind, chars = text.chars().count(), %max_length, "text extracted");

        let request = SummaryRequest::new(text, max_length);
        let result = self.summarizer.summarize(&request).await?;
        Ok(result)
    }
}
