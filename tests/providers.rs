//! Ollama and OpenAI bindings against local mock endpoints.

mod common;

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use content_summarizer::config::SummarizerConfig;
use content_summarizer::error::SummarizationError;
use content_summarizer::models::SummaryLength;
use content_summarizer::summarizer::{GenerationParams, OllamaModel, OpenAIModel, SummaryModel};

const ARTICLE: &str = "The observatory recorded a meteor shower last night, with more than \
    forty visible trails per hour during the peak between two and three in the morning.";

/// Request body and `Authorization` header seen by the mock endpoint.
type Captured = Arc<Mutex<Vec<(Value, Option<String>)>>>;

async fn spawn_endpoint(path: &'static str, status: StatusCode, reply: Value) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route(
            path,
            post(
                move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        let auth = headers
                            .get(header::AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        captured.lock().unwrap().push((body, auth));
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(captured.clone());
    (common::spawn_server(router).await, captured)
}

fn params(max: u32) -> GenerationParams {
    GenerationParams::for_length(SummaryLength::new(max).unwrap())
}

// ─── Ollama ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ollama_generate_round_trip() {
    let (url, captured) = spawn_endpoint(
        "/api/generate",
        StatusCode::OK,
        json!({ "model": "llama3.2", "response": "  A bright meteor shower peaked overnight.\n", "done": true }),
    )
    .await;
    let model = OllamaModel::new(&SummarizerConfig {
        provider: "ollama".into(),
        url: Some(url),
        ..SummarizerConfig::default()
    })
    .unwrap();

    let summary = model.generate(ARTICLE, &params(90)).await.unwrap();
    assert_eq!(summary.trim(), "A bright meteor shower peaked overnight.");

    let seen = captured.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let body = &seen[0].0;
    assert_eq!(body["model"], "llama3.2");
    assert_eq!(body["stream"], false);
    assert_eq!(body["options"]["temperature"], 0);
    assert_eq!(body["options"]["num_predict"], 90);
    assert!(body["prompt"].as_str().unwrap().contains("meteor shower"));
}

#[tokio::test]
async fn test_ollama_missing_response_field_is_invocation_error() {
    let (url, _captured) =
        spawn_endpoint("/api/generate", StatusCode::OK, json!({ "done": true })).await;
    let model = OllamaModel::new(&SummarizerConfig {
        url: Some(url),
        ..SummarizerConfig::default()
    })
    .unwrap();

    let err = model.generate(ARTICLE, &params(150)).await.unwrap_err();
    assert!(matches!(err, SummarizationError::ModelInvocation { .. }));
}

#[tokio::test]
async fn test_ollama_error_status_mentions_endpoint() {
    let (url, _captured) = spawn_endpoint(
        "/api/generate",
        StatusCode::NOT_FOUND,
        json!({ "error": "model 'llama3.2' not found" }),
    )
    .await;
    let model = OllamaModel::new(&SummarizerConfig {
        url: Some(url.clone()),
        ..SummarizerConfig::default()
    })
    .unwrap();

    match model.generate(ARTICLE, &params(150)).await.unwrap_err() {
        SummarizationError::ModelInvocation { message, .. } => {
            assert!(message.contains("404"), "{}", message);
            assert!(message.contains(&url), "{}", message);
        }
        other => panic!("expected ModelInvocation, got {:?}", other),
    }
}

// ─── OpenAI ─────────────────────────────────────────────────────────────

fn openai_config(url: &str, key_env: &str) -> SummarizerConfig {
    SummarizerConfig {
        provider: "openai".into(),
        model: Some("gpt-4o-mini".into()),
        url: Some(url.to_string()),
        api_key_env: Some(key_env.to_string()),
        ..SummarizerConfig::default()
    }
}

#[tokio::test]
async fn test_openai_chat_completion_round_trip() {
    let (url, captured) = spawn_endpoint(
        "/chat/completions",
        StatusCode::OK,
        json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Meteor shower peaked at 40+ trails an hour." } }
            ]
        }),
    )
    .await;
    std::env::set_var("CSUM_TEST_OPENAI_KEY_OK", "sk-test");
    let model = OpenAIModel::new(&openai_config(&url, "CSUM_TEST_OPENAI_KEY_OK")).unwrap();
    assert_eq!(model.model_name(), "gpt-4o-mini");

    let summary = model.generate(ARTICLE, &params(120)).await.unwrap();
    assert_eq!(summary, "Meteor shower peaked at 40+ trails an hour.");

    let seen = captured.lock().unwrap();
    let (body, auth) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"], 0);
    assert_eq!(body["max_tokens"], 120);
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("meteor shower"));
}

#[tokio::test]
async fn test_openai_malformed_response_is_invocation_error() {
    let (url, _captured) =
        spawn_endpoint("/chat/completions", StatusCode::OK, json!({ "choices": [] })).await;
    std::env::set_var("CSUM_TEST_OPENAI_KEY_EMPTY", "sk-test");
    let model = OpenAIModel::new(&openai_config(&url, "CSUM_TEST_OPENAI_KEY_EMPTY")).unwrap();

    match model.generate(ARTICLE, &params(150)).await.unwrap_err() {
        SummarizationError::ModelInvocation { model, message } => {
            assert_eq!(model, "gpt-4o-mini");
            assert!(message.contains("choices"), "{}", message);
        }
        other => panic!("expected ModelInvocation, got {:?}", other),
    }
}
