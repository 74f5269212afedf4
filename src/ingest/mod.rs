pub mod dispatcher;
pub mod normalize;
pub mod pdf;
pub mod plaintext;
pub mod scanner;
pub mod splitter;

use std::path::Path;

use crate::error::Result;
use crate::models::Page;

pub use dispatcher::Dispatcher;
pub use normalize::normalize;
pub use scanner::Scanner;
pub use splitter::{RecursiveCharacterSplitter, TextSplitter};

/// Trait for backends that turn a document into ordered pages.
pub trait PageLoader: Send + Sync {
    /// Format identifier.
    fn format(&self) -> &str;

    /// Load every page of the document at `path`, in document order.
    fn load(&self, path: &Path) -> Result<Vec<Page>>;
}
