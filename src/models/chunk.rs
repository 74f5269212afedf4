use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered key/value metadata carried by pages and chunks.
pub type Metadata = serde_json::Map<String, Value>;

/// Metadata key: 1-based page number.
pub const PAGE_KEY: &str = "page";
/// Metadata key: number of pages in the source document.
pub const TOTAL_PAGES_KEY: &str = "total_pages";
/// Metadata key: name of the splitting strategy.
pub const CHUNK_METHOD_KEY: &str = "chunk_method";
/// Metadata key: character count of the cleaned source page.
pub const CHAR_COUNT_KEY: &str = "char_count";
/// Metadata key: originating file path, as passed in.
pub const SOURCE_KEY: &str = "source";

/// A segment of cleaned page text plus the metadata describing where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Cleaned text of this segment.
    pub content: String,
    /// Loader metadata merged with the per-page chunking keys.
    pub metadata: Metadata,
}

impl Chunk {
    #[must_use]
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<usize> {
        self.usize_field(PAGE_KEY)
    }

    #[must_use]
    pub fn total_pages(&self) -> Option<usize> {
        self.usize_field(TOTAL_PAGES_KEY)
    }

    #[must_use]
    pub fn char_count(&self) -> Option<usize> {
        self.usize_field(CHAR_COUNT_KEY)
    }

    #[must_use]
    pub fn chunk_method(&self) -> Option<&str> {
        self.metadata.get(CHUNK_METHOD_KEY).and_then(Value::as_str)
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(Value::as_str)
    }

    /// Length of the content in characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.content.chars().count()
    }

    fn usize_field(&self, key: &str) -> Option<usize> {
        self.metadata
            .get(key)
            .and_then(Value::as_u64)
            .map(|v| v as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Chunk {
        let mut metadata = Metadata::new();
        metadata.insert(PAGE_KEY.into(), json!(2));
        metadata.insert(TOTAL_PAGES_KEY.into(), json!(5));
        metadata.insert(CHUNK_METHOD_KEY.into(), json!("RecursiveCharacterTextSplitter"));
        metadata.insert(CHAR_COUNT_KEY.into(), json!(120));
        metadata.insert(SOURCE_KEY.into(), json!("docs/report.pdf"));
        Chunk::new("caf\u{e9} au lait", metadata)
    }

    #[test]
    fn accessors_read_metadata() {
        let c = sample();
        assert_eq!(c.page(), Some(2));
        assert_eq!(c.total_pages(), Some(5));
        assert_eq!(c.char_count(), Some(120));
        assert_eq!(c.chunk_method(), Some("RecursiveCharacterTextSplitter"));
        assert_eq!(c.source(), Some("docs/report.pdf"));
    }

    #[test]
    fn missing_keys_read_as_none() {
        let c = Chunk::new("text", Metadata::new());
        assert_eq!(c.page(), None);
        assert_eq!(c.source(), None);
    }

    #[test]
    fn len_counts_chars_not_bytes() {
        let c = sample();
        assert_eq!(c.len_chars(), 12);
        assert!(c.content.len() > c.len_chars());
    }

    #[test]
    fn serializes_with_metadata_in_insertion_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.starts_with("{\"content\":"));
        let page = json.find("\"page\"").unwrap();
        let source = json.find("\"source\"").unwrap();
        assert!(page < source);
    }
}
