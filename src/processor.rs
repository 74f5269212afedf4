use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::error::{ChunkError, Result};
use crate::ingest::normalize::{char_len, normalize};
use crate::ingest::{Dispatcher, PageLoader, RecursiveCharacterSplitter, TextSplitter};
use crate::models::chunk::{
    CHAR_COUNT_KEY, CHUNK_METHOD_KEY, PAGE_KEY, SOURCE_KEY, TOTAL_PAGES_KEY,
};
use crate::models::{Chunk, Page};

/// Default target chunk length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap between consecutive chunks of one page.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;
/// Pages whose cleaned, trimmed text is shorter than this are dropped.
pub const DEFAULT_MIN_PAGE_CHARS: usize = 50;

/// Result of processing a single document.
#[derive(Debug)]
pub enum Outcome {
    /// At least one page qualified and produced chunks.
    Chunked(Vec<Chunk>),
    /// The document loaded but no page had enough text.
    Empty,
    /// Loading failed.
    Failed(ChunkError),
}

/// Coarse status of an [`Outcome`], used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Chunked,
    Empty,
    Failed,
}

impl Outcome {
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Chunked(_) => Status::Chunked,
            Self::Empty => Status::Empty,
            Self::Failed(_) => Status::Failed,
        }
    }

    /// Chunks produced, empty for `Empty` and `Failed`.
    #[must_use]
    pub fn into_chunks(self) -> Vec<Chunk> {
        match self {
            Self::Chunked(chunks) => chunks,
            Self::Empty | Self::Failed(_) => Vec::new(),
        }
    }

    /// Convert to a `Result`, turning `Failed` into its error.
    pub fn into_result(self) -> Result<Vec<Chunk>> {
        match self {
            Self::Chunked(chunks) => Ok(chunks),
            Self::Empty => Ok(Vec::new()),
            Self::Failed(e) => Err(e),
        }
    }
}

/// Chunks of one document plus the number of pages it had.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub total_pages: usize,
    pub chunks: Vec<Chunk>,
}

/// Loads a document, cleans each page and splits it into annotated chunks.
///
/// The chunker only holds immutable configuration, so one instance can serve
/// any number of documents, sequentially or from several threads.
pub struct DocumentChunker<L = Dispatcher, S = RecursiveCharacterSplitter> {
    loader: L,
    splitter: S,
    min_page_chars: usize,
}

impl DocumentChunker {
    /// Chunker with extension-based loading and space-only recursive splitting.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let splitter = RecursiveCharacterSplitter::new(chunk_size, chunk_overlap)?;
        Ok(Self::with_parts(Dispatcher::new(), splitter))
    }
}

impl<L: PageLoader, S: TextSplitter> DocumentChunker<L, S> {
    pub fn with_parts(loader: L, splitter: S) -> Self {
        Self {
            loader,
            splitter,
            min_page_chars: DEFAULT_MIN_PAGE_CHARS,
        }
    }

    #[must_use]
    pub fn with_min_page_chars(mut self, min_page_chars: usize) -> Self {
        self.min_page_chars = min_page_chars;
        self
    }

    #[must_use]
    pub fn min_page_chars(&self) -> usize {
        self.min_page_chars
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn splitter(&self) -> &S {
        &self.splitter
    }

    /// Chunk a document, absorbing failures.
    ///
    /// A document that cannot be read yields an empty list, same as one with
    /// no qualifying pages. The failure is logged; use [`Self::process_outcome`]
    /// or [`Self::try_process`] to tell the two apart.
    pub fn process(&self, path: impl AsRef<Path>) -> Vec<Chunk> {
        let path = path.as_ref();
        match self.try_process(path) {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "document skipped");
                Vec::new()
            }
        }
    }

    /// Chunk a document, propagating load failures.
    pub fn try_process(&self, path: impl AsRef<Path>) -> Result<Vec<Chunk>> {
        self.process_document(path).map(|doc| doc.chunks)
    }

    /// Chunk a document, keeping the page count alongside the chunks.
    pub fn process_document(&self, path: impl AsRef<Path>) -> Result<ProcessedDocument> {
        let path = path.as_ref();
        let pages = self.loader.load(path)?;
        Ok(ProcessedDocument {
            total_pages: pages.len(),
            chunks: self.chunk_pages(&pages, &path.to_string_lossy()),
        })
    }

    /// Chunk a document and report which of the three outcomes occurred.
    pub fn process_outcome(&self, path: impl AsRef<Path>) -> Outcome {
        match self.try_process(path) {
            Ok(chunks) if chunks.is_empty() => Outcome::Empty,
            Ok(chunks) => Outcome::Chunked(chunks),
            Err(e) => Outcome::Failed(e),
        }
    }

    /// Chunk already-loaded pages; `source` is recorded on every chunk.
    #[must_use]
    pub fn chunk_pages(&self, pages: &[Page], source: &str) -> Vec<Chunk> {
        let total_pages = pages.len();
        let chunks: Vec<Chunk> = pages
            .iter()
            .flat_map(|page| self.chunk_page(page, total_pages, source))
            .collect();
        tracing::debug!(source, total_pages, chunks = chunks.len(), "document chunked");
        chunks
    }

    /// Chunk one page. Returns nothing when its cleaned text is too short.
    #[must_use]
    pub fn chunk_page(&self, page: &Page, total_pages: usize, source: &str) -> Vec<Chunk> {
        let cleaned = normalize(&page.content);
        if char_len(cleaned.trim()) < self.min_page_chars {
            tracing::debug!(source, page = page.index, "page below minimum length, skipped");
            return Vec::new();
        }

        let mut metadata = page.metadata.clone();
        metadata.insert(PAGE_KEY.into(), json!(page.index));
        metadata.insert(TOTAL_PAGES_KEY.into(), json!(total_pages));
        metadata.insert(CHUNK_METHOD_KEY.into(), json!(self.splitter.method()));
        metadata.insert(CHAR_COUNT_KEY.into(), json!(char_len(&cleaned)));
        metadata.insert(SOURCE_KEY.into(), json!(source));

        self.splitter
            .split_text(&cleaned)
            .into_iter()
            .map(|text| Chunk::new(text, metadata.clone()))
            .collect()
    }
}
