//! Text extraction from the two non-trivial input sources.
//!
//! - [`web`]: fetch an article over HTTP and keep its paragraph text.
//! - [`document`]: pull the text layer out of a PDF, page by page.
//!
//! Plain text needs no extraction and is handled directly by
//! [`Pipeline`](crate::pipeline::Pipeline). Both extractors return plain
//! UTF-8 text or an [`ExtractionError`](crate::error::ExtractionError);
//! neither panics nor keeps state between calls.

pub mod document;
pub mod web;

pub use document::extract_pdf_text;
pub use web::{paragraph_text, WebExtractor};
