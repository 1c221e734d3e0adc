//! # Content Summarizer
//!
//! Summarize articles, PDFs, or custom text with a pretrained abstractive
//! summarization model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌─────────────┐
//! │  RawInput   │──▶│  Extractors  │──▶│ Summarizer  │
//! │ text/url/pdf│   │  web / pdf   │   │ guard+model │
//! └─────────────┘   └──────────────┘   └──────┬──────┘
//!                                             │
//!                      ┌──────────────────────┤
//!                      ▼                      ▼
//!                 ┌──────────┐          ┌──────────┐
//!                 │   CLI    │          │  Web UI  │
//!                 │  (csum)  │          │  (axum)  │
//!                 └──────────┘          └──────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. A shell (CLI or web UI) builds a [`models::RawInput`] and picks a
//!    [`models::SummaryLength`] in `[50, 300]`.
//! 2. The [`pipeline`] dispatches the input to its extractor: URLs go to
//!    [`extract::web`], PDFs to [`extract::document`], plain text is used as-is.
//! 3. The [`summarizer`] returns the "too short" sentinel for texts under 50
//!    characters, and otherwise calls the configured model binding once with
//!    greedy decoding.
//!
//! ## Quick Start
//!
//! ```bash
//! csum text "$(cat notes.txt)"
//! csum url https://example.com/article --length 200
//! csum pdf ./paper.pdf
//! csum serve                    # web UI on 127.0.0.1:8501
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`models`] | Request-scoped data types and length bounds |
//! | [`error`] | Extraction and summarization error taxonomy |
//! | [`extract`] | Web article and PDF text extraction |
//! | [`summarizer`] | Model trait, bindings, and the length-guarded summarizer |
//! | [`pipeline`] | Input dispatch: extract then summarize |
//! | [`commands`] | CLI command implementations |
//! | [`server`] | Single-page web UI (Axum) |
//! | [`logging`] | `tracing` subscriber setup |

pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod summarizer;
