//! Concrete [`SummaryModel`] bindings.
//!
//! Every binding makes exactly one HTTP request per [`generate`] call and
//! maps any failure (transport, non-2xx status, malformed response) to
//! [`SummarizationError::ModelInvocation`].
//!
//! [`generate`]: SummaryModel::generate

use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{GenerationParams, SummaryModel};
use crate::config::SummarizerConfig;
use crate::error::SummarizationError;

fn build_client(config: &SummarizerConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

fn base_url(config: &SummarizerConfig, default: &str) -> String {
    config
        .url
        .as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

/// Send `body` as JSON with `request` and return the JSON response.
///
/// Non-2xx statuses become invocation errors carrying the response body.
async fn post_json(
    model: &str,
    request: reqwest::RequestBuilder,
    body: &Value,
) -> Result<Value, SummarizationError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| SummarizationError::invocation(model, format!("request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        return Err(SummarizationError::invocation(
            model,
            format!("API error {}: {}", status, body_text),
        ));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| SummarizationError::invocation(model, format!("invalid JSON response: {}", e)))
}

/// Instruction used by the chat/generate bindings, which have no native
/// notion of a minimum output length.
pub fn summary_prompt(text: &str, params: &GenerationParams) -> String {
    format!(
        "Write an abstractive summary of the following text in {} to {} words. \
         Respond with the summary only.\n\n{}",
        params.min_length, params.max_length, text
    )
}

// ============ Hugging Face ============

const HF_DEFAULT_URL: &str = "https://router.huggingface.co/hf-inference";
const HF_DEFAULT_MODEL: &str = "t5-small";
const HF_DEFAULT_KEY_ENV: &str = "HF_TOKEN";

/// Binding for the Hugging Face Inference API `summarization` task.
///
/// Calls `POST {url}/models/{model}` with the decoding parameters passed
/// through untouched, so `min_length`, `max_length` and `do_sample` are
/// enforced by the model runtime itself. The bearer token is read from the
/// environment variable named by `api_key_env` (default `HF_TOKEN`) and is
/// optional, which also allows self-hosted endpoints.
pub struct HuggingFaceModel {
    client: reqwest::Client,
    model: String,
    endpoint: String,
    api_key: Option<String>,
}

impl HuggingFaceModel {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| HF_DEFAULT_MODEL.to_string());
        let endpoint = format!("{}/models/{}", base_url(config, HF_DEFAULT_URL), model);
        let key_env = config.api_key_env.as_deref().unwrap_or(HF_DEFAULT_KEY_ENV);
        let api_key = std::env::var(key_env).ok().filter(|k| !k.is_empty());

        Ok(Self {
            client: build_client(config)?,
            model,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl SummaryModel for HuggingFaceModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, SummarizationError> {
        let body = huggingface_request(text, params);
        let mut request = self.client.post(&self.endpoint);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let json = post_json(&self.model, request, &body).await?;
        parse_huggingface_response(&json)
            .map_err(|msg| SummarizationError::invocation(&self.model, msg))
    }
}

pub fn huggingface_request(text: &str, params: &GenerationParams) -> Value {
    json!({
        "inputs": text,
        "parameters": {
            "min_length": params.min_length,
            "max_length": params.max_length,
            "do_sample": params.do_sample,
        },
        "options": { "wait_for_model": true },
    })
}

/// Extract `summary_text` from the first result.
///
/// Accepts both the list form (`[{"summary_text": ...}]`) and a bare
/// object; an `{"error": ...}` payload is reported as an error.
pub fn parse_huggingface_response(json: &Value) -> Result<String, String> {
    if let Some(err) = json.get("error").and_then(|e| e.as_str()) {
        return Err(format!("model returned error: {}", err));
    }

    let first = match json {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| "Invalid response: empty result list".to_string())?,
        other => other,
    };

    first
        .get("summary_text")
        .and_then(|s| s.as_str())
        .map(str::to_string)
        .ok_or_else(|| "Invalid response: missing summary_text".to_string())
}

// ============ Ollama ============

const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";
const OLLAMA_DEFAULT_MODEL: &str = "llama3.2";

/// Binding for a local Ollama instance (`POST /api/generate`).
///
/// Decoding is pinned with `temperature = 0` and a fixed seed;
/// `num_predict` caps output at the requested maximum.
pub struct OllamaModel {
    client: reqwest::Client,
    model: String,
    url: String,
}

impl OllamaModel {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| OLLAMA_DEFAULT_MODEL.to_string());
        Ok(Self {
            client: build_client(config)?,
            model,
            url: base_url(config, OLLAMA_DEFAULT_URL),
        })
    }
}

#[async_trait]
impl SummaryModel for OllamaModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, SummarizationError> {
        let body = json!({
            "model": self.model,
            "prompt": summary_prompt(text, params),
            "stream": false,
            "options": {
                "temperature": 0,
                "seed": 0,
                "num_predict": params.max_length,
            },
        });
        let request = self.client.post(format!("{}/api/generate", self.url));
        let json = post_json(&self.model, request, &body).await.map_err(|e| match e {
            SummarizationError::ModelInvocation { model, message } => {
                SummarizationError::ModelInvocation {
                    model,
                    message: format!("{} (is Ollama running at {}?)", message, self.url),
                }
            }
            other => other,
        })?;

        json.get("response")
            .and_then(|r| r.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                SummarizationError::invocation(&self.model, "Invalid Ollama response: missing response")
            })
    }
}

// ============ OpenAI ============

const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1";
const OPENAI_DEFAULT_KEY_ENV: &str = "OPENAI_API_KEY";

/// Binding for an OpenAI-compatible chat completions endpoint.
///
/// Requires an API key in `OPENAI_API_KEY` (or the variable named by
/// `api_key_env`) at construction time.
pub struct OpenAIModel {
    client: reqwest::Client,
    model: String,
    url: String,
    api_key: String,
}

impl OpenAIModel {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("summarizer.model required for OpenAI provider"))?;
        let key_env = config.api_key_env.as_deref().unwrap_or(OPENAI_DEFAULT_KEY_ENV);
        let api_key = match std::env::var(key_env) {
            Ok(key) if !key.is_empty() => key,
            _ => bail!("{} environment variable not set", key_env),
        };

        Ok(Self {
            client: build_client(config)?,
            model,
            url: base_url(config, OPENAI_DEFAULT_URL),
            api_key,
        })
    }
}

#[async_trait]
impl SummaryModel for OpenAIModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, SummarizationError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": "You write concise, faithful abstractive summaries." },
                { "role": "user", "content": summary_prompt(text, params) },
            ],
            "temperature": 0,
            "seed": 0,
            "max_tokens": params.max_length,
        });
        let request = self
            .client
            .post(format!("{}/chat/completions", self.url))
            .bearer_auth(&self.api_key);
        let json = post_json(&self.model, request, &body).await?;

        json.pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                SummarizationError::invocation(
                    &self.model,
                    "Invalid OpenAI response: missing choices[0].message.content",
                )
            })
    }
}

// ============ Disabled ============

/// A binding that always fails.
///
/// Used when `summarizer.provider = "disabled"`; extraction still works
/// (see `csum extract`), but every summarization attempt errors.
pub struct DisabledModel;

#[async_trait]
impl SummaryModel for DisabledModel {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn generate(
        &self,
        _text: &str,
        _params: &GenerationParams,
    ) -> Result<String, SummarizationError> {
        Err(SummarizationError::invocation(
            "disabled",
            "summarizer provider is disabled",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationParams {
        GenerationParams {
            min_length: 50,
            max_length: 150,
            do_sample: false,
        }
    }

    #[test]
    fn hf_request_carries_decoding_params() {
        let body = huggingface_request("some text", &params());
        assert_eq!(body["inputs"], "some text");
        assert_eq!(body["parameters"]["min_length"], 50);
        assert_eq!(body["parameters"]["max_length"], 150);
        assert_eq!(body["parameters"]["do_sample"], false);
    }

    #[test]
    fn hf_response_takes_first_summary() {
        let json = json!([{ "summary_text": "first" }, { "summary_text": "second" }]);
        assert_eq!(parse_huggingface_response(&json).unwrap(), "first");
    }

    #[test]
    fn hf_response_accepts_bare_object() {
        let json = json!({ "summary_text": "only" });
        assert_eq!(parse_huggingface_response(&json).unwrap(), "only");
    }

    #[test]
    fn hf_response_reports_errors() {
        assert!(parse_huggingface_response(&json!([])).is_err());
        assert!(parse_huggingface_response(&json!([{ "generated_text": "x" }])).is_err());
        let err = parse_huggingface_response(&json!({ "error": "Model is loading" })).unwrap_err();
        assert!(err.contains("Model is loading"));
    }

    #[test]
    fn hf_endpoint_joins_url_and_model() {
        let config = SummarizerConfig {
            url: Some("http://127.0.0.1:9000/".into()),
            model: Some("facebook/bart-large-cnn".into()),
            ..SummarizerConfig::default()
        };
        let model = HuggingFaceModel::new(&config).unwrap();
        assert_eq!(
            model.endpoint,
            "http://127.0.0.1:9000/models/facebook/bart-large-cnn"
        );
        assert_eq!(model.model_name(), "facebook/bart-large-cnn");
    }

    #[test]
    fn openai_requires_api_key() {
        let config = SummarizerConfig {
            provider: "openai".into(),
            model: Some("gpt-4o-mini".into()),
            api_key_env: Some("CONTENT_SUMMARIZER_TEST_UNSET_KEY".into()),
            ..SummarizerConfig::default()
        };
        let err = OpenAIModel::new(&config).err().unwrap();
        assert!(err.to_string().contains("CONTENT_SUMMARIZER_TEST_UNSET_KEY"));
    }

    #[test]
    fn prompt_states_length_bounds() {
        let prompt = summary_prompt("body", &params());
        assert!(prompt.contains("50 to 150 words"));
        assert!(prompt.ends_with("body"));
    }
}
