// Inherit lint configuration from lib.rs for consistency
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::needless_pass_by_value
)]

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pdfchunk::cli::commands::{Cli, Command};
use pdfchunk::cli::output;
use pdfchunk::config::{Config, FailurePolicy, OutputFormat};
use pdfchunk::ingest::normalize;
use pdfchunk::ingest::scanner::SkippedFile;
use pdfchunk::pipeline::{self, DocumentReport, Totals};

fn main() {
    // stdout carries results, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CmdResult {
    let config = Config::load(cli.config.as_deref()).map_err(map_err)?;
    match cli.command {
        Command::Chunk {
            inputs,
            chunk_size,
            chunk_overlap,
            min_page_chars,
            strict,
            summary,
            format,
        } => {
            let overrides = ChunkOverrides {
                chunk_size,
                chunk_overlap,
                min_page_chars,
                strict,
                format,
            };
            cmd_chunk(config, &inputs, &overrides, summary)
        }
        Command::Pages { path } => cmd_pages(&config, &path),
        Command::Clean { text } => cmd_clean(text),
        Command::Config => cmd_config(&config),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

/// Command-line values that take precedence over the config file.
struct ChunkOverrides {
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    min_page_chars: Option<usize>,
    strict: bool,
    format: Option<OutputFormat>,
}

impl ChunkOverrides {
    fn apply(&self, config: &mut Config) {
        let settings = &mut config.settings;
        if let Some(size) = self.chunk_size {
            settings.chunking.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            settings.chunking.chunk_overlap = overlap;
        }
        if let Some(min) = self.min_page_chars {
            settings.chunking.min_page_chars = min;
        }
        if self.strict {
            settings.errors.policy = FailurePolicy::Propagate;
        }
        if let Some(format) = self.format {
            settings.output.format = format;
        }
    }
}

fn cmd_chunk(
    mut config: Config,
    inputs: &[PathBuf],
    overrides: &ChunkOverrides,
    summary: bool,
) -> CmdResult {
    overrides.apply(&mut config);
    let format = config.settings.output.format;
    let result = pipeline::run_chunking(&config, inputs).map_err(map_err)?;

    #[derive(Serialize)]
    struct Summary<'a> {
        documents: &'a [DocumentReport],
        skipped: &'a [SkippedFile],
        totals: &'a Totals,
    }
    let report = Summary {
        documents: &result.documents,
        skipped: &result.skipped,
        totals: &result.totals,
    };

    if summary {
        println!("{}", output::format_as(&report, format));
    } else {
        if !result.chunks.is_empty() || format != OutputFormat::Jsonl {
            println!("{}", output::format_as(&result.chunks, format));
        }
        // Totals are diagnostic; keep stdout to the chunks alone
        eprintln!("{}", output::format_json(&report.totals));
    }
    Ok(())
}

fn cmd_pages(config: &Config, path: &Path) -> CmdResult {
    let reports = pipeline::inspect_pages(config, path).map_err(map_err)?;
    println!(
        "{}",
        output::format_as(&reports, config.settings.output.format)
    );
    Ok(())
}

fn cmd_clean(text: Option<String>) -> CmdResult {
    let raw = match text {
        Some(t) => t,
        None => std::io::read_to_string(std::io::stdin()).map_err(map_err)?,
    };
    println!("{}", normalize(&raw));
    Ok(())
}

fn cmd_config(config: &Config) -> CmdResult {
    if let Some(path) = &config.config_path {
        tracing::info!(path = %path.display(), "loaded config");
    }
    let rendered = config.to_toml().map_err(map_err)?;
    print!("{rendered}");
    Ok(())
}
