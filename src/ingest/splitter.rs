use std::collections::VecDeque;

use crate::error::{ChunkError, Result};
use crate::ingest::normalize::char_len;

/// Name reported in chunk metadata for [`RecursiveCharacterSplitter`].
pub const RECURSIVE_CHARACTER_METHOD: &str = "RecursiveCharacterTextSplitter";

/// Trait for strategies that cut a block of text into bounded segments.
pub trait TextSplitter: Send + Sync {
    /// Identifier recorded as `chunk_method` on every chunk.
    fn method(&self) -> &str;

    /// Split text into ordered segments.
    fn split_text(&self, text: &str) -> Vec<String>;
}

/// Separator-driven splitter with overlapping windows.
///
/// The first separator present in the text is used to cut it into pieces
/// (each separator stays glued to the start of the piece that follows it).
/// Pieces are then packed greedily into windows of at most `chunk_size`
/// characters, and each new window starts with up to `chunk_overlap`
/// characters carried over from the end of the previous one. A piece that is
/// itself too long is split again with the next separator, or emitted whole
/// when no separators remain, so `chunk_size` is a target rather than a hard
/// limit.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Create a splitter that only breaks on single spaces.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::with_separators(chunk_size, chunk_overlap, vec![" ".to_string()])
    }

    /// Create a splitter with an ordered list of literal separators.
    ///
    /// An empty separator means "between any two characters".
    pub fn with_separators(
        chunk_size: usize,
        chunk_overlap: usize,
        separators: Vec<String>,
    ) -> Result<Self> {
        if chunk_size == 0 || chunk_overlap > chunk_size {
            return Err(ChunkError::InvalidChunking {
                chunk_size,
                chunk_overlap,
            });
        }
        let separators = if separators.is_empty() {
            vec![String::new()]
        } else {
            separators
        };
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators,
        })
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    #[must_use]
    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // Pick the first separator that actually occurs; fall back to the last one.
        let mut separator = separators.last().map_or("", String::as_str);
        let mut remaining: &[String] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = "";
                break;
            }
            if text.contains(sep.as_str()) {
                separator = sep.as_str();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut fitting: Vec<&str> = Vec::new();
        for piece in split_keep_leading(text, separator) {
            if char_len(piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                final_chunks.extend(self.merge_pieces(&fitting));
                fitting.clear();
            }
            if remaining.is_empty() {
                let whole = piece.trim();
                if !whole.is_empty() {
                    final_chunks.push(whole.to_string());
                }
            } else {
                final_chunks.extend(self.split_recursive(piece, remaining));
            }
        }
        if !fitting.is_empty() {
            final_chunks.extend(self.merge_pieces(&fitting));
        }

        final_chunks
    }

    /// Pack pieces into windows, carrying an overlap tail between windows.
    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        total,
                        chunk_size = self.chunk_size,
                        "created a chunk longer than the configured size"
                    );
                }
                if !window.is_empty() {
                    if let Some(doc) = join_window(&window) {
                        docs.push(doc);
                    }
                    // Shrink to the overlap tail, and further if the next piece still won't fit.
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match window.pop_front() {
                            Some((_, front_len)) => total -= front_len,
                            None => break,
                        }
                    }
                }
            }
            window.push_back((piece, len));
            total += len;
        }

        if let Some(doc) = join_window(&window) {
            docs.push(doc);
        }
        docs
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn method(&self) -> &str {
        RECURSIVE_CHARACTER_METHOD
    }

    fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }
}

/// Split on `separator`, keeping each separator at the start of the following
/// piece. Empty pieces are dropped; an empty separator yields single characters.
fn split_keep_leading<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, ch)| &text[i..i + ch.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn join_window(window: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
