//! Single-page web UI.
//!
//! Serves one HTML page where the operator picks a source (Text / URL /
//! PDF Upload), sets the summary length and presses Summarize. The page posts
//! a multipart form to `/summarize` and displays the returned summary or
//! error message.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | The summarizer page |
//! | `POST` | `/summarize` | Extract and summarize one input (multipart form) |
//! | `GET`  | `/health` | Health check (returns version and model) |
//!
//! # Form Fields
//!
//! | Field | Required | Description |
//! |-------|----------|-------------|
//! | `kind` | yes | `text`, `url`, or `pdf` |
//! | `text` | for `text` | Text to summarize |
//! | `url` | for `url` | Article address |
//! | `file` | for `pdf` | PDF upload |
//! | `length` | no | Maximum summary length, 50–300 (default from config) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "extraction_failed", "message": "unreadable PDF document: ..." } }
//! ```
//!
//! Error codes: `bad_request` (400), `input_too_long` (413),
//! `extraction_failed` (422), `upstream_status` (502),
//! `summarization_failed` (502).

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ExtractionError, PipelineError, SummarizationError};
use crate::models::{InputKind, RawInput, SummaryLength};
use crate::pipeline::Pipeline;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
    default_length: SummaryLength,
}

/// Starts the web UI.
///
/// Creates the model binding once, binds to `[server].bind`, and serves
/// until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pipeline = Arc::new(Pipeline::from_config(config)?);
    let app = router(pipeline, config);

    let bind_addr = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("summarizer listening on http://{}", bind_addr);
    println!("Content Summarizer running at http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router around an existing pipeline.
pub fn router(pipeline: Arc<Pipeline>, config: &Config) -> Router {
    let state = AppState {
        pipeline,
        default_length: config.summarizer.default_summary_length(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/summarize", post(handle_summarize))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let message = err.to_string();
        let (status, code) = match &err {
            PipelineError::Extraction(ExtractionError::HttpStatus { .. }) => {
                (StatusCode::BAD_GATEWAY, "upstream_status")
            }
            PipelineError::Extraction(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "extraction_failed")
            }
            PipelineError::Summarization(SummarizationError::InputTooLong { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "input_too_long")
            }
            PipelineError::Summarization(SummarizationError::ModelInvocation { .. }) => {
                (StatusCode::BAD_GATEWAY, "summarization_failed")
            }
        };
        AppError {
            status,
            code,
            message,
        }
    }
}

// ============ GET / ============

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    model: String,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.pipeline.summarizer().model_name().to_string(),
    })
}

// ============ POST /summarize ============

#[derive(Serialize)]
struct SummarizeResponse {
    summary: String,
    too_short: bool,
}

/// Form fields collected from the multipart body.
#[derive(Default)]
struct SummarizeForm {
    kind: Option<String>,
    text: Option<String>,
    url: Option<String>,
    file: Option<Vec<u8>>,
    length: Option<String>,
}

impl SummarizeForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = SummarizeForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| bad_request(format!("invalid form data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| bad_request(format!("failed to read upload: {}", e)))?;
                    form.file = Some(bytes.to_vec());
                }
                "kind" | "text" | "url" | "length" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| bad_request(format!("invalid field '{}': {}", name, e)))?;
                    match name.as_str() {
                        "kind" => form.kind = Some(value),
                        "text" => form.text = Some(value),
                        "url" => form.url = Some(value),
                        _ => form.length = Some(value),
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    fn into_input(
        self,
        default_length: SummaryLength,
    ) -> Result<(RawInput, SummaryLength), AppError> {
        let kind = self
            .kind
            .as_deref()
            .ok_or_else(|| bad_request("kind is required"))?
            .parse::<InputKind>()
            .map_err(bad_request)?;

        let length = match self.length.as_deref().map(str::trim) {
            None | Some("") => default_length,
            Some(raw) => raw.parse::<SummaryLength>().map_err(bad_request)?,
        };

        let input = match kind {
            InputKind::PlainText => RawInput::PlainText(self.text.unwrap_or_default()),
            InputKind::Url => match self.url.map(|u| u.trim().to_string()) {
                Some(url) if !url.is_empty() => RawInput::Url(url),
                _ => return Err(bad_request("url must not be empty")),
            },
            InputKind::Document => match self.file {
                Some(bytes) if !bytes.is_empty() => RawInput::Document(bytes),
                _ => return Err(bad_request("a PDF file is required")),
            },
        };

        Ok((input, length))
    }
}

async fn handle_summarize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummarizeResponse>, AppError> {
    let form = SummarizeForm::read(multipart).await?;
    let (input, length) = form.into_input(state.default_length)?;

    let result = state.pipeline.run(input, length).await.map_err(|e| {
        warn!(error = %e, "summarize request failed");
        AppError::from(e)
    })?;

    Ok(Json(SummarizeResponse {
        too_short: result.is_too_short(),
        summary: result.to_string(),
    }))
}
