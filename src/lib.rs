// Pedantic lint configuration for the crate.
// Most of these are reasonable but too strict for this codebase:
// - cast_possible_truncation: Page and chunk counts stay far below u32/usize limits
// - missing_errors_doc: Error handling is self-evident from Result types
// - missing_panics_doc: Panics are rare and documented inline
// - items_after_statements: Output structs are clearer near their usage
// - module_name_repetitions: `ChunkError` in `error` reads better than `Error`
// - must_use_candidate: Accessors are not annotated one by one
// - option_if_let_else: if-let is often clearer
// - needless_pass_by_value: Sometimes clearer semantically
#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::option_if_let_else,
    clippy::needless_pass_by_value
)]

//! Page-aware PDF text cleaning and chunking.
//!
//! ```text
//! path -> PageLoader -> normalize -> min length filter -> TextSplitter -> Chunk + metadata
//! ```
//!
//! [`processor::DocumentChunker`] is the entry point for a single document;
//! [`pipeline::run_chunking`] drives it over files and directories.

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod processor;

pub use error::{ChunkError, Result};
pub use models::{Chunk, Metadata, Page};
pub use processor::{DocumentChunker, Outcome};
