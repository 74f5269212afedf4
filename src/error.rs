use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("pdf error in {path}: {detail}")]
    Pdf { path: String, detail: String },

    #[error(
        "invalid chunking: chunk_overlap ({chunk_overlap}) must not exceed chunk_size ({chunk_size}), and chunk_size must be positive"
    )]
    InvalidChunking {
        chunk_size: usize,
        chunk_overlap: usize,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ChunkError>;
