use std::path::Path;

use serde_json::json;

use crate::error::{ChunkError, Result};
use crate::ingest::PageLoader;
use crate::models::{Metadata, Page};

/// Page-based PDF text extractor.
pub struct PdfLoader;

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfLoader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract one page per PDF page from an in-memory document.
    ///
    /// Each page's metadata holds the document info entries (`title`,
    /// `producer`, ...) followed by `source`, recorded verbatim, and the
    /// 0-based `page`.
    pub fn load_from_mem(&self, bytes: &[u8], source: &str) -> Result<Vec<Page>> {
        // The extraction backend can panic on malformed input; surface that as an error.
        let extracted = std::panic::catch_unwind(|| {
            let texts = pdf_extract::extract_text_from_mem_by_pages(bytes)?;
            Ok::<_, pdf_extract::OutputError>((texts, document_info(bytes)))
        });

        let (texts, info) = match extracted {
            Ok(Ok(extracted)) => extracted,
            Ok(Err(e)) => {
                return Err(ChunkError::Pdf {
                    path: source.to_string(),
                    detail: format!("PDF extraction error: {e}"),
                })
            }
            Err(panic) => {
                return Err(ChunkError::Pdf {
                    path: source.to_string(),
                    detail: format!("PDF extraction panicked: {}", panic_message(&*panic)),
                })
            }
        };

        tracing::debug!(source, pages = texts.len(), info = info.len(), "pdf extracted");
        Ok(pages_from_texts(texts, source)
            .into_iter()
            .map(|mut page| {
                let mut metadata = info.clone();
                metadata.extend(page.metadata);
                page.metadata = metadata;
                page
            })
            .collect())
    }
}

/// Text entries of the trailer's `/Info` dictionary, keys lowercased.
///
/// Encrypted documents and entries that are not text strings are skipped.
fn document_info(bytes: &[u8]) -> Metadata {
    let mut info = Metadata::new();
    let Ok(doc) = pdf_extract::Document::load_mem(bytes) else {
        return info;
    };
    if doc.is_encrypted() {
        return info;
    }
    let dict = doc
        .trailer
        .get(b"Info")
        .and_then(|obj| doc.dereference(obj))
        .and_then(|(_, obj)| obj.as_dict());
    let Ok(dict) = dict else {
        return info;
    };

    for (key, value) in dict.iter() {
        let Ok((_, value)) = doc.dereference(value) else {
            continue;
        };
        if let Ok(text) = pdf_extract::decode_text_string(value) {
            let text = text.trim_end_matches('\0').trim();
            if !text.is_empty() {
                info.insert(String::from_utf8_lossy(key).to_lowercase(), json!(text));
            }
        }
    }
    info
}

impl PageLoader for PdfLoader {
    fn format(&self) -> &'static str {
        "pdf"
    }

    fn load(&self, path: &Path) -> Result<Vec<Page>> {
        let source = path.to_string_lossy();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ChunkError::FileNotFound {
                path: source.to_string(),
            },
            _ => ChunkError::Io(e),
        })?;
        self.load_from_mem(&bytes, &source)
    }
}

/// Build pages from per-page texts, with `source` and 0-based `page` metadata.
pub(crate) fn pages_from_texts(texts: Vec<String>, source: &str) -> Vec<Page> {
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let mut metadata = Metadata::new();
            metadata.insert("source".into(), json!(source));
            metadata.insert("page".into(), json!(i));
            Page::new(i + 1, text, metadata)
        })
        .collect()
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
