//! PDF text extraction.
//!
//! Text is pulled from each page's text layer with `pdf-extract`. Pages
//! without embedded text (scanned images) contribute nothing; there is no
//! OCR fallback.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::ExtractionError;

/// Separator placed between the texts of consecutive non-empty pages.
pub const PAGE_SEPARATOR: &str = "\n";

/// Extract the text of every page of `bytes`, in page order.
///
/// Empty and whitespace-only pages are skipped (they do not leave a blank
/// line behind); the remaining page texts are trimmed and joined with
/// [`PAGE_SEPARATOR`].
///
/// # Errors
///
/// [`ExtractionError::DocumentFormat`] if the bytes are not a readable PDF,
/// including encrypted documents and inputs that make the PDF backend panic.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = extract_pages(bytes)?;
    let total = pages.len();
    let text = join_pages(&pages);
    debug!(pages = total, chars = text.chars().count(), "extracted PDF text");
    Ok(text)
}

/// Join page texts, skipping pages that carry no text.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|page| page.as_ref().trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    if !bytes.windows(5).take(1024).any(|w| w == b"%PDF-") {
        return Err(ExtractionError::DocumentFormat(
            "missing %PDF- header".to_string(),
        ));
    }

    // pdf-extract panics on some malformed inputs; keep that inside this call.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match outcome {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::DocumentFormat(e.to_string())),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(%message, "PDF backend panicked");
            Err(ExtractionError::DocumentFormat(message))
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "PDF parser aborted".to_string()
    }
}
