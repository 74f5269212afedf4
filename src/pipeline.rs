use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{Config, FailurePolicy};
use crate::error::Result;
use crate::ingest::normalize::{char_len, normalize};
use crate::ingest::scanner::{Scanner, SkipReason, SkippedFile};
use crate::ingest::PageLoader;
use crate::models::Chunk;
use crate::processor::Status;

/// What happened to one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: String,
    pub status: Status,
    /// Pages the loader returned (0 when loading failed).
    pub pages: usize,
    pub chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Counts across a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Totals {
    pub documents: usize,
    pub chunked: usize,
    pub empty: usize,
    pub failed: usize,
    pub skipped: usize,
    pub chunks: usize,
}

/// Result of a chunking run over several inputs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub documents: Vec<DocumentReport>,
    pub skipped: Vec<SkippedFile>,
    pub totals: Totals,
    /// All chunks, in input order then page order.
    pub chunks: Vec<Chunk>,
}

impl BatchResult {
    fn record(&mut self, report: DocumentReport, chunks: Vec<Chunk>) {
        self.totals.documents += 1;
        match report.status {
            Status::Chunked => self.totals.chunked += 1,
            Status::Empty => self.totals.empty += 1,
            Status::Failed => self.totals.failed += 1,
        }
        self.totals.chunks += chunks.len();
        self.documents.push(report);
        self.chunks.extend(chunks);
    }
}

/// Per-page view of how a document would be chunked.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    /// 1-based page number.
    pub page: usize,
    pub raw_chars: usize,
    pub clean_chars: usize,
    /// Whether the page falls below the minimum length.
    pub skipped: bool,
    pub chunks: usize,
}

/// Expand inputs into document paths.
///
/// Files are taken as given, without checking that they exist, unless they
/// exceed the size limit; directories are scanned for the configured extensions.
pub fn collect_documents(
    config: &Config,
    inputs: &[PathBuf],
) -> Result<(Vec<PathBuf>, Vec<SkippedFile>)> {
    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let scan = Scanner::new(input)
                .with_extensions(&config.settings.scan.extensions)
                .with_max_file_size(config.settings.scan.max_file_size_mb)
                .scan()?;
            tracing::debug!(dir = %input.display(), found = scan.files.len(), "scanned directory");
            files.extend(scan.files);
            skipped.extend(scan.skipped);
        } else if input
            .metadata()
            .is_ok_and(|meta| config.is_file_too_large(meta.len()))
        {
            skipped.push(SkippedFile {
                path: input.to_string_lossy().into_owned(),
                reason: SkipReason::TooLarge,
            });
        } else {
            files.push(input.clone());
        }
    }
    Ok((files, skipped))
}

/// Chunk every input document.
///
/// Documents are processed in parallel but reported in input order. With
/// [`FailurePolicy::Propagate`] the first failing document (in input order)
/// aborts the run; with [`FailurePolicy::Suppress`] it is reported as failed
/// and the rest still count.
pub fn run_chunking(config: &Config, inputs: &[PathBuf]) -> Result<BatchResult> {
    let chunker = config.build_chunker()?;
    let (files, skipped) = collect_documents(config, inputs)?;
    let policy = config.settings.errors.policy;

    let processed: Vec<_> = files
        .par_iter()
        .map(|path| chunker.process_document(path))
        .collect();

    let mut result = BatchResult {
        totals: Totals {
            skipped: skipped.len(),
            ..Default::default()
        },
        skipped,
        ..Default::default()
    };

    for (path, outcome) in files.iter().zip(processed) {
        let shown = path.to_string_lossy().into_owned();
        match outcome {
            Ok(doc) => {
                let status = if doc.chunks.is_empty() {
                    Status::Empty
                } else {
                    Status::Chunked
                };
                let report = DocumentReport {
                    path: shown,
                    status,
                    pages: doc.total_pages,
                    chunks: doc.chunks.len(),
                    error: None,
                };
                result.record(report, doc.chunks);
            }
            Err(e) if policy == FailurePolicy::Propagate => return Err(e),
            Err(e) => {
                tracing::warn!(path = %shown, error = %e, "document skipped");
                let report = DocumentReport {
                    path: shown,
                    status: Status::Failed,
                    pages: 0,
                    chunks: 0,
                    error: Some(e.to_string()),
                };
                result.record(report, Vec::new());
            }
        }
    }

    tracing::info!(
        documents = result.totals.documents,
        chunks = result.totals.chunks,
        failed = result.totals.failed,
        "chunking run finished"
    );
    Ok(result)
}

/// Report per page how the document would be cleaned and chunked.
pub fn inspect_pages(config: &Config, path: &Path) -> Result<Vec<PageReport>> {
    let chunker = config.build_chunker()?;
    let pages = chunker.loader().load(path)?;
    let total_pages = pages.len();
    let source = path.to_string_lossy();

    Ok(pages
        .iter()
        .map(|page| {
            let cleaned = normalize(&page.content);
            let chunks = chunker.chunk_page(page, total_pages, &source).len();
            PageReport {
                page: page.index,
                raw_chars: char_len(&page.content),
                clean_chars: char_len(&cleaned),
                skipped: char_len(cleaned.trim()) < chunker.min_page_chars(),
                chunks,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn long_text(word: &str) -> String {
        vec![word; 40].join(" ")
    }

    /// Writes text dumps (form feed separated pages) into a temp dir.
    fn setup() -> (TempDir, Config) {
        let tmp = tempfile::tempdir().unwrap();
        let docs = tmp.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(
            docs.join("a.txt"),
            format!("{}\x0Ctiny\x0C{}", long_text("alpha"), long_text("gamma")),
        )
        .unwrap();
        fs::write(docs.join("b.txt"), "short\x0Calso short").unwrap();

        let mut config = Config::default();
        config.settings.scan.extensions = vec!["txt".into()];
        config.settings.chunking.chunk_size = 120;
        config.settings.chunking.chunk_overlap = 20;
        (tmp, config)
    }

    #[test]
    fn scans_directory_and_reports_statuses() {
        let (tmp, config) = setup();
        let result = run_chunking(&config, &[tmp.path().join("docs")]).unwrap();

        assert_eq!(result.totals.documents, 2);
        assert_eq!(result.documents[0].status, Status::Chunked);
        assert_eq!(result.documents[0].pages, 3);
        assert_eq!(result.documents[1].status, Status::Empty);
        assert_eq!(result.documents[1].pages, 2);
        assert_eq!(result.totals.chunks, result.chunks.len());
        assert_eq!(result.totals.chunked, 1);
        assert_eq!(result.totals.empty, 1);
    }

    #[test]
    fn chunks_follow_input_then_page_order() {
        let (tmp, config) = setup();
        let result = run_chunking(&config, &[tmp.path().join("docs")]).unwrap();
        let pages: Vec<usize> = result.chunks.iter().filter_map(Chunk::page).collect();
        let mut sorted = pages.clone();
        sorted.sort_unstable();
        assert_eq!(pages, sorted);
        assert!(!pages.contains(&2));
    }

    #[test]
    fn suppress_keeps_going_after_failure() {
        let (tmp, config) = setup();
        let inputs = vec![
            tmp.path().join("missing.pdf"),
            tmp.path().join("docs/a.txt"),
        ];
        let result = run_chunking(&config, &inputs).unwrap();

        assert_eq!(result.totals.failed, 1);
        assert_eq!(result.documents[0].status, Status::Failed);
        assert!(result.documents[0].error.as_deref().unwrap().contains("not found"));
        assert_eq!(result.documents[1].status, Status::Chunked);
    }

    #[test]
    fn propagate_aborts_on_failure() {
        let (tmp, mut config) = setup();
        config.settings.errors.policy = FailurePolicy::Propagate;
        let inputs = vec![
            tmp.path().join("docs/a.txt"),
            tmp.path().join("missing.pdf"),
        ];
        assert!(run_chunking(&config, &inputs).is_err());
    }

    #[test]
    fn oversized_explicit_file_is_skipped() {
        let (tmp, mut config) = setup();
        config.settings.scan.max_file_size_mb = 1;
        let big = tmp.path().join("big.txt");
        fs::write(&big, vec![b'x'; 1024 * 1024 + 1]).unwrap();

        let result = run_chunking(&config, &[big, tmp.path().join("docs/a.txt")]).unwrap();
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].reason, SkipReason::TooLarge);
        assert_eq!(result.totals.skipped, 1);
        assert_eq!(result.totals.documents, 1);
    }

    #[test]
    fn invalid_chunking_fails_before_any_work() {
        let (tmp, mut config) = setup();
        config.settings.chunking.chunk_overlap = 500;
        assert!(run_chunking(&config, &[tmp.path().join("docs")]).is_err());
    }

    #[test]
    fn inspect_reports_each_page() {
        let (tmp, config) = setup();
        let reports = inspect_pages(&config, &tmp.path().join("docs/a.txt")).unwrap();
        assert_eq!(reports.len(), 3);
        assert!(!reports[0].skipped);
        assert!(reports[0].chunks > 1);
        assert!(reports[1].skipped);
        assert_eq!(reports[1].chunks, 0);
        assert_eq!(reports[1].clean_chars, 4);
        assert_eq!(reports[2].page, 3);
    }

    #[test]
    fn inspect_missing_file_is_an_error() {
        let (tmp, config) = setup();
        assert!(inspect_pages(&config, &tmp.path().join("nope.pdf")).is_err());
    }
}
