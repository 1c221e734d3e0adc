//! CLI command implementations.
//!
//! Each `csum` subcommand builds a [`RawInput`] from its arguments, runs it
//! through the [`Pipeline`] and prints the outcome. The summary (or the
//! extracted text) goes to stdout; errors go to stderr with exit status 1.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::extract::WebExtractor;
use crate::models::{InputKind, RawInput, SummaryLength};
use crate::pipeline::Pipeline;
use crate::summarizer::{DisabledModel, Summarizer};

/// Where the text of a `csum text` invocation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl TextSource {
    /// Pick the source from the CLI arguments. Stdin is only used when it is
    /// not a terminal, so a bare `csum text` does not hang waiting for input.
    pub fn from_args(text: Option<String>, file: Option<PathBuf>) -> Result<Self> {
        match (text, file) {
            (Some(_), Some(_)) => bail!("pass either TEXT or --file, not both"),
            (Some(text), None) if text == "-" => Ok(TextSource::Stdin),
            (Some(text), None) => Ok(TextSource::Inline(text)),
            (None, Some(path)) => Ok(TextSource::File(path)),
            (None, None) if !atty::is(atty::Stream::Stdin) => Ok(TextSource::Stdin),
            (None, None) => bail!("no text given: pass TEXT, --file <PATH>, or pipe text on stdin"),
        }
    }

    pub fn read(self) -> Result<String> {
        match self {
            TextSource::Inline(text) => Ok(text),
            TextSource::File(path) => std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read text file: {}", path.display())),
            TextSource::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read text from stdin")?;
                Ok(text)
            }
        }
    }
}

/// Read a PDF from disk into memory. The file handle is closed before
/// extraction starts.
pub fn read_document(path: &Path) -> Result<RawInput> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read PDF: {}", path.display()))?;
    Ok(RawInput::Document(bytes))
}

/// Build the input for `csum extract <kind> <payload>`.
pub fn input_for_kind(kind: InputKind, payload: Option<String>) -> Result<RawInput> {
    match kind {
        InputKind::PlainText => {
            let text = TextSource::from_args(payload, None)?.read()?;
            Ok(RawInput::PlainText(text))
        }
        InputKind::Url => match payload {
            Some(url) if !url.trim().is_empty() => Ok(RawInput::Url(url)),
            _ => bail!("a URL is required"),
        },
        InputKind::Document => match payload {
            Some(path) => read_document(Path::new(&path)),
            None => bail!("a PDF path is required"),
        },
    }
}

/// Extract and summarize `input`, printing the summary or the sentinel.
pub async fn run_summarize(
    config: &Config,
    input: RawInput,
    length: Option<SummaryLength>,
) -> Result<()> {
    let length = length.unwrap_or_else(|| config.summarizer.default_summary_length());
    let pipeline = Pipeline::from_config(config)?;

    match pipeline.run(input, length).await {
        Ok(result) => {
            println!("{}", result);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run only the extraction step and print the extracted text.
///
/// No model binding is created, so this works with any provider setting.
pub async fn run_extract(config: &Config, input: RawInput) -> Result<()> {
    let summarizer = Summarizer::new(Arc::new(DisabledModel), &config.summarizer);
    let pipeline = Pipeline::new(WebExtractor::new(&config.fetch)?, summarizer);

    match pipeline.extract(input).await {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {} ({})", e, e.kind());
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn inline_text_wins() {
        let source = TextSource::from_args(Some("hello".into()), None).unwrap();
        assert_eq!(source, TextSource::Inline("hello".into()));
    }

    #[test]
    fn dash_means_stdin() {
        let source = TextSource::from_args(Some("-".into()), None).unwrap();
        assert_eq!(source, TextSource::Stdin);
    }

    #[test]
    fn text_and_file_conflict() {
        assert!(TextSource::from_args(Some("a".into()), Some("b.txt".into())).is_err());
    }

    #[test]
    fn reads_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"file contents").unwrap();
        let source = TextSource::from_args(None, Some(file.path().to_path_buf())).unwrap();
        assert_eq!(source.read().unwrap(), "file contents");
    }

    #[test]
    fn missing_pdf_is_an_error() {
        assert!(read_document(Path::new("/nonexistent/file.pdf")).is_err());
    }

    #[test]
    fn url_kind_requires_payload() {
        assert!(input_for_kind(InputKind::Url, None).is_err());
        assert_eq!(
            input_for_kind(InputKind::Url, Some("https://example.com".into())).unwrap(),
            RawInput::Url("https://example.com".into())
        );
    }
}
