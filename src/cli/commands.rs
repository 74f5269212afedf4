use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "pdfchunk",
    version,
    about = "Clean PDF text page by page and split it into overlapping chunks",
    after_help = "Settings are read from ./pdfchunk.toml when present (or --config). \
                  Command-line flags override the file. Set RUST_LOG=debug for diagnostics on stderr."
)]
pub struct Cli {
    /// Config file to use instead of ./pdfchunk.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Chunk one or more documents and print the chunks as JSON.
    ///
    /// Directories are scanned recursively for PDF files, or the extensions set
    /// in pdfchunk.toml (respecting .gitignore).
    /// `.txt` inputs are read as text dumps with form feeds between pages.
    /// Unreadable documents are reported as failed and skipped unless --strict is set.
    Chunk {
        /// Files or directories to process
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Target maximum characters per chunk
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Characters shared between consecutive chunks of a page
        #[arg(long)]
        chunk_overlap: Option<usize>,
        /// Skip pages with fewer cleaned characters than this
        #[arg(long)]
        min_page_chars: Option<usize>,
        /// Abort on the first document that cannot be processed
        #[arg(long)]
        strict: bool,
        /// Print per-document reports and totals without the chunks
        #[arg(long)]
        summary: bool,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show per-page character counts and which pages would be skipped
    Pages {
        /// Document to inspect
        path: PathBuf,
    },

    /// Normalize text the way page content is cleaned before chunking
    Clean {
        /// Text to clean (reads stdin when omitted)
        text: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}
