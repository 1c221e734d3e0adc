//! Shared fixtures: a throwaway article server, a scripted summarization
//! model, and a minimal PDF builder.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    http::{header, StatusCode},
    response::Html,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use content_summarizer::config::SummarizerConfig;
use content_summarizer::error::SummarizationError;
use content_summarizer::summarizer::{GenerationParams, SummaryModel};

pub const ARTICLE_HTML: &str = "<html><head><title>News</title></head><body>\
    <nav>Home | World | Sport</nav>\
    <p>The city council approved a new budget on Tuesday after weeks of debate.</p>\
    <div class=\"ad\">Buy now</div>\
    <p>The plan increases funding for public transit and road repairs.</p>\
    </body></html>";

pub const ARTICLE_TEXT: &str = "The city council approved a new budget on Tuesday after weeks of debate. \
    The plan increases funding for public transit and road repairs.";

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Article fixture routes used by the URL extraction tests.
pub fn article_router() -> Router {
    Router::new()
        .route("/article", get(|| async { Html(ARTICLE_HTML) }))
        .route("/ab", get(|| async { Html("<p>A</p><p>B</p>") }))
        .route(
            "/no-paragraphs",
            get(|| async { Html("<html><body><h1>Title</h1><div>Only divs here.</div></body></html>") }),
        )
        .route(
            "/missing",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Html("<p>This page does not exist, but it has plenty of paragraph text.</p>"),
                )
            }),
        )
        .route(
            "/latin1",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "text/html; charset=iso-8859-1")],
                    b"<html><body><p>Caf\xe9 cr\xe8me</p></body></html>".to_vec(),
                )
            }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
}

pub async fn spawn_article_server() -> String {
    spawn_server(article_router()).await
}

/// An address nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/article", port)
}

/// Deterministic stand-in for a summarization model.
///
/// Returns the first eight words of its input and records every call.
pub struct ScriptedModel {
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<(String, GenerationParams)>>,
    pub fail_with: Option<String>,
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
            fail_with: None,
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummaryModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, SummarizationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs
            .lock()
            .unwrap()
            .push((text.to_string(), *params));
        if let Some(message) = &self.fail_with {
            return Err(SummarizationError::ModelInvocation {
                model: "scripted".into(),
                message: message.clone(),
            });
        }
        Ok(expected_summary(text))
    }
}

/// What [`ScriptedModel`] returns for `text`.
pub fn expected_summary(text: &str) -> String {
    text.split_whitespace().take(8).collect::<Vec<_>>().join(" ")
}

pub fn summarizer_config() -> SummarizerConfig {
    SummarizerConfig::default()
}

/// Build a PDF with one page per entry. An empty entry produces a page
/// whose content stream draws no text (like a scanned page).
///
/// Byte offsets in the xref table are computed while writing, so
/// pdf-extract can parse the result.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids,
        pages.len()
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());
    for (i, text) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 3 0 R >> >> >>",
            5 + 2 * i
        ));
        let content = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET", text)
        };
        objects.push(format!(
            "<< /Length {} >> stream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj {} endobj\n", i + 1, body).as_bytes());
    }
    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer << /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        )
        .as_bytes(),
    );
    out
}
