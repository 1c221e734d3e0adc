//! Summarization model abstraction and the length-guarded [`Summarizer`].
//!
//! Defines the [`SummaryModel`] trait and concrete bindings (see
//! [`providers`]):
//! - **[`HuggingFaceModel`]**: Hugging Face Inference API (or any endpoint
//!   speaking the same `summarization` task contract). The default, with
//!   `t5-small`.
//! - **[`OllamaModel`]**: a local Ollama instance's `/api/generate`.
//! - **[`OpenAIModel`]**: an OpenAI-compatible `/chat/completions` endpoint.
//! - **[`DisabledModel`]**: always fails; used when summarization is off.
//!
//! The model itself is a black box. [`Summarizer`] owns everything around
//! it: the minimum-input guard, the oversize policy, and the fixed decoding
//! parameters.
//!
//! # Guarantees
//!
//! - Text shorter than [`MIN_INPUT_CHARS`] returns
//!   [`SummaryResult::TooShort`] and the model is never called.
//! - The model is always asked for at least [`MIN_SUMMARY_LENGTH`] and at
//!   most the requested [`SummaryLength`], with sampling disabled.
//! - Each call makes exactly one model invocation; failures are returned
//!   as-is, never retried.
//!
//! # Provider Selection
//!
//! ```rust,no_run
//! # use content_summarizer::config::SummarizerConfig;
//! # use content_summarizer::summarizer::{create_model, SummaryModel};
//! let config = SummarizerConfig::default(); // provider = "huggingface"
//! let model = create_model(&config).unwrap();
//! assert_eq!(model.model_name(), "t5-small");
//! ```

pub mod providers;

use std::borrow::Cow;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{OversizePolicy, SummarizerConfig};
use crate::error::SummarizationError;
use crate::models::{
    SummaryLength, SummaryRequest, SummaryResult, MIN_INPUT_CHARS, MIN_SUMMARY_LENGTH,
};

pub use providers::{DisabledModel, HuggingFaceModel, OllamaModel, OpenAIModel};

/// Decoding parameters passed to every model invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    pub min_length: u32,
    pub max_length: u32,
    /// Always `false`: greedy decoding keeps output deterministic.
    pub do_sample: bool,
}

impl GenerationParams {
    pub fn for_length(max_length: SummaryLength) -> Self {
        Self {
            min_length: MIN_SUMMARY_LENGTH,
            max_length: max_length.get(),
            do_sample: false,
        }
    }
}

/// A pretrained abstractive summarization model.
///
/// Implementations must be stateless across calls (or internally
/// synchronized): one instance is shared by every request.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    /// Returns the model identifier (e.g. `"t5-small"`).
    fn model_name(&self) -> &str;

    /// Produce one summary of `text`.
    async fn generate(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, SummarizationError>;
}

/// Length-guarded front end to a [`SummaryModel`].
pub struct Summarizer {
    model: Arc<dyn SummaryModel>,
    max_input_chars: usize,
    oversize: OversizePolicy,
    exclusive: Option<Mutex<()>>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn SummaryModel>, config: &SummarizerConfig) -> Self {
        Self {
            model,
            // A limit below the minimum input would let truncation hand the
            // model text the too-short guard rejects.
            max_input_chars: config.max_input_chars.max(MIN_INPUT_CHARS),
            oversize: config.oversize,
            exclusive: config.exclusive.then(|| Mutex::new(())),
        }
    }

    /// Create the configured model binding and wrap it.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let model = create_model(config)?;
        info!(
            provider = %config.provider,
            model = model.model_name(),
            "summarization model ready"
        );
        Ok(Self::new(model, config))
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Summarize `request.text`, bounded by `request.max_length`.
    ///
    /// # Errors
    ///
    /// - [`SummarizationError::InputTooLong`] when the text exceeds the
    ///   configured limit and the policy is `reject`.
    /// - [`SummarizationError::ModelInvocation`] when the model call fails.
    pub async fn summarize(
        &self,
        request: &SummaryRequest,
    ) -> Result<SummaryResult, SummarizationError> {
        let chars = request.char_len();
        if chars < MIN_INPUT_CHARS {
            debug!(chars, "input below minimum length, skipping model");
            return Ok(SummaryResult::TooShort);
        }

        let input = self.fit_input(&request.text, chars)?;
        let params = GenerationParams::for_length(request.max_length);

        let _guard = match &self.exclusive {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        debug!(
            model = self.model.model_name(),
            chars,
            max_length = params.max_length,
            "invoking summarization model"
        );
        let summary = self.model.generate(&input, &params).await?;
        Ok(SummaryResult::Summary(summary.trim().to_string()))
    }

    fn fit_input<'a>(
        &self,
        text: &'a str,
        chars: usize,
    ) -> Result<Cow<'a, str>, SummarizationError> {
        if chars <= self.max_input_chars {
            return Ok(Cow::Borrowed(text));
        }
        match self.oversize {
            OversizePolicy::Reject => Err(SummarizationError::InputTooLong {
                chars,
                limit: self.max_input_chars,
            }),
            OversizePolicy::Truncate => {
                let cut = truncate_chars(text, self.max_input_chars);
                warn!(
                    chars,
                    kept = cut.chars().count(),
                    limit = self.max_input_chars,
                    "input truncated before summarization"
                );
                Ok(Cow::Borrowed(cut))
            }
        }
    }
}

/// Return a prefix of `text` of at most `limit` characters, cut at the last
/// whitespace inside the limit when there is one.
///
/// The word-boundary cut is only taken when it keeps at least
/// [`MIN_INPUT_CHARS`] characters; otherwise the prefix is cut hard at
/// `limit`.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    let end = match text.char_indices().nth(limit) {
        Some((idx, _)) => idx,
        None => return text,
    };
    let prefix = &text[..end];
    // The character right after the prefix being whitespace means the cut
    // already falls on a word boundary.
    let word_cut = if text[end..].starts_with(char::is_whitespace) {
        prefix.trim_end()
    } else {
        match prefix.rfind(char::is_whitespace) {
            Some(ws) if ws > 0 => prefix[..ws].trim_end(),
            _ => prefix,
        }
    };
    if word_cut.chars().count() >= MIN_INPUT_CHARS {
        word_cut
    } else {
        prefix
    }
}

/// Create the [`SummaryModel`] selected by `config.provider`.
///
/// # Supported Providers
///
/// | Config Value | Binding |
/// |-------------|---------|
/// | `"huggingface"` | [`HuggingFaceModel`] |
/// | `"ollama"` | [`OllamaModel`] |
/// | `"openai"` | [`OpenAIModel`] |
/// | `"disabled"` | [`DisabledModel`] |
///
/// # Errors
///
/// Returns an error for unknown provider names or when the binding cannot be
/// initialized (missing model name or API key).
pub fn create_model(config: &SummarizerConfig) -> Result<Arc<dyn SummaryModel>> {
    match config.provider.as_str() {
        "huggingface" => Ok(Arc::new(HuggingFaceModel::new(config)?)),
        "ollama" => Ok(Arc::new(OllamaModel::new(config)?)),
        "openai" => Ok(Arc::new(OpenAIModel::new(config)?)),
        "disabled" => Ok(Arc::new(DisabledModel)),
        other => bail!("Unknown summarizer provider: {}", other),
    }
}
