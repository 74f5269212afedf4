use crate::models::chunk::Metadata;

/// One unit of extracted document text, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based position in the document.
    pub index: usize,
    /// Raw extracted text.
    pub content: String,
    /// Loader-supplied metadata, forwarded unchanged onto every chunk.
    pub metadata: Metadata,
}

impl Page {
    #[must_use]
    pub fn new(index: usize, content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            index,
            content: content.into(),
            metadata,
        }
    }
}
