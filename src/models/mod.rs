pub mod chunk;
pub mod page;

pub use chunk::{Chunk, Metadata};
pub use page::Page;
