//! # Content Summarizer CLI (`csum`)
//!
//! Summarize pasted text, web articles, or PDF documents from the command
//! line, or start the single-page web UI.
//!
//! ## Usage
//!
//! ```bash
//! csum --config ./config/summarizer.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `csum text [TEXT]` | Summarize text (argument, `--file`, or stdin) |
//! | `csum url <URL>` | Summarize the paragraphs of a web article |
//! | `csum pdf <PATH>` | Summarize the text of a PDF document |
//! | `csum extract <KIND> [PAYLOAD]` | Print extracted text without summarizing |
//! | `csum serve` | Start the web UI |
//!
//! ## Examples
//!
//! ```bash
//! # Summarize an article in at most 200 tokens
//! csum url https://example.com/article --length 200
//!
//! # Summarize a paper
//! csum pdf ./paper.pdf
//!
//! # Pipe text in
//! cat notes.txt | csum text
//!
//! # Start the web UI on the configured address
//! csum serve
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use content_summarizer::commands::{self, TextSource};
use content_summarizer::models::{InputKind, RawInput, SummaryLength};
use content_summarizer::{config, logging, server};

/// Content Summarizer: summarize articles, PDFs, or custom text with a
/// pretrained summarization model.
#[derive(Parser)]
#[command(
    name = "csum",
    about = "Content Summarizer: summarize articles, PDFs, or custom text",
    version,
    long_about = "Extracts text from pasted text, a web article URL, or a PDF document and \
    produces a length-bounded abstractive summary using a pretrained summarization model."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/summarizer.toml`. Built-in defaults are used when
    /// the file does not exist.
    #[arg(long, global = true, default_value = "./config/summarizer.toml")]
    config: PathBuf,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize text.
    ///
    /// Reads TEXT, the file given with `--file`, or stdin when it is piped
    /// (or when TEXT is `-`).
    Text {
        /// Text to summarize.
        text: Option<String>,

        /// Read the text from a file instead.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Maximum summary length (50–300). Defaults to `summarizer.default_length`.
        #[arg(long)]
        length: Option<SummaryLength>,
    },

    /// Fetch a web article and summarize its paragraph text.
    Url {
        /// Article URL.
        url: String,

        /// Maximum summary length (50–300). Defaults to `summarizer.default_length`.
        #[arg(long)]
        length: Option<SummaryLength>,
    },

    /// Summarize the text of a PDF document.
    Pdf {
        /// Path to the PDF file.
        path: PathBuf,

        /// Maximum summary length (50–300). Defaults to `summarizer.default_length`.
        #[arg(long)]
        length: Option<SummaryLength>,
    },

    /// Print the extracted text of an input without summarizing it.
    Extract {
        /// Input kind: `text`, `url`, or `pdf`.
        kind: InputKind,

        /// The text, URL, or PDF path. Text may also come from stdin.
        payload: Option<String>,
    },

    /// Start the single-page web UI.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Text { text, file, length } => {
            let text = TextSource::from_args(text, file)?.read()?;
            commands::run_summarize(&cfg, RawInput::PlainText(text), length).await?;
        }
        Commands::Url { url, length } => {
            commands::run_summarize(&cfg, RawInput::Url(url), length).await?;
        }
        Commands::Pdf { path, length } => {
            let input = commands::read_document(&path)?;
            commands::run_summarize(&cfg, input, length).await?;
        }
        Commands::Extract { kind, payload } => {
            let input = commands::input_for_kind(kind, payload)?;
            commands::run_extract(&cfg, input).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
