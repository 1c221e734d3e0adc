//! Web article extraction.
//!
//! Performs a single HTTP GET and keeps the text of every `<p>` element,
//! space-joined in document order. No JavaScript runs, no retries are made,
//! and redirects and character decoding are left to `reqwest`'s defaults.

use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::error::ExtractionError;

/// Fetches web pages and extracts their paragraph text.
///
/// Holds only a `reqwest::Client` (a connection pool), so one instance can
/// be shared by every request.
#[derive(Debug, Clone)]
pub struct WebExtractor {
    client: reqwest::Client,
}

impl WebExtractor {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and return its paragraph text.
    ///
    /// A page without `<p>` elements yields an empty string.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::Network`] when the request cannot be completed.
    /// - [`ExtractionError::HttpStatus`] for any non-2xx response; the error
    ///   page's body is never parsed.
    /// - [`ExtractionError::Parse`] when the body cannot be decoded as text.
    pub async fn extract(&self, url: &str) -> Result<String, ExtractionError> {
        info!(%url, "fetching article");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractionError::Network {
                url: url.to_string(),
                message: describe_transport_error(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ExtractionError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let text = paragraph_text(&body);
        debug!(
            %url,
            body_bytes = body.len(),
            chars = text.chars().count(),
            "extracted paragraph text"
        );
        Ok(text)
    }
}

/// Space-join the text content of every `<p>` element in `html`.
///
/// Each paragraph contributes all of its descendant text nodes, so inline
/// markup such as `<a>` or `<em>` keeps its words. Parsing is lenient:
/// malformed markup is repaired the way a browser would, not rejected.
///
/// ```rust
/// use content_summarizer::extract::paragraph_text;
///
/// assert_eq!(paragraph_text("<p>A</p><p>B</p>"), "A B");
/// assert_eq!(paragraph_text("<div>no paragraphs</div>"), "");
/// ```
pub fn paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p").expect("static selector is valid");
    document
        .select(&selector)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else if e.is_builder() {
        format!("invalid request: {}", e)
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paragraphs_in_document_order() {
        assert_eq!(paragraph_text("<p>A</p><p>B</p>"), "A B");
    }

    #[test]
    fn no_paragraphs_yields_empty_string() {
        let html = "<html><body><h1>Title</h1><div>Body</div></body></html>";
        assert_eq!(paragraph_text(html), "");
    }

    #[test]
    fn keeps_inline_markup_text() {
        let html = "<p>Rust is <em>fast</em> and <a href='#'>safe</a>.</p>";
        assert_eq!(paragraph_text(html), "Rust is fast and safe.");
    }

    #[test]
    fn ignores_text_outside_paragraphs() {
        let html = "<nav>Menu</nav><article><p>One</p><aside>Ad</aside><p>Two</p></article>";
        assert_eq!(paragraph_text(html), "One Two");
    }

    #[test]
    fn tolerates_unclosed_paragraphs() {
        assert_eq!(paragraph_text("<p>First<p>Second"), "First Second");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(paragraph_text("<p>Fish &amp; chips</p>"), "Fish & chips");
    }
}
