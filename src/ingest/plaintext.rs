use std::path::Path;

use crate::error::{ChunkError, Result};
use crate::ingest::pdf::pages_from_texts;
use crate::ingest::PageLoader;
use crate::models::Page;

/// Page break character emitted by text dumps such as `pdftotext`.
const FORM_FEED: char = '\x0C';

/// Loader for already-extracted text files.
///
/// Pages are separated by form feeds; a file without any is a single page.
/// Blank pages are kept so page numbers and counts match the original
/// document.
pub struct PlaintextLoader;

impl Default for PlaintextLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaintextLoader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Split a text dump into pages.
    #[must_use]
    pub fn load_from_str(&self, source_text: &str, source: &str) -> Vec<Page> {
        let body = source_text.strip_suffix(FORM_FEED).unwrap_or(source_text);
        let texts = body.split(FORM_FEED).map(str::to_string).collect();
        pages_from_texts(texts, source)
    }
}

impl PageLoader for PlaintextLoader {
    fn format(&self) -> &'static str {
        "plaintext"
    }

    fn load(&self, path: &Path) -> Result<Vec<Page>> {
        let source = path.to_string_lossy();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ChunkError::FileNotFound {
                path: source.to_string(),
            },
            _ => ChunkError::Io(e),
        })?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ChunkError::Other(format!("{source} is not valid UTF-8: {e}")))?;
        Ok(self.load_from_str(&text, &source))
    }
}
