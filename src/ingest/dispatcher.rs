use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::ingest::pdf::PdfLoader;
use crate::ingest::plaintext::PlaintextLoader;
use crate::ingest::PageLoader;
use crate::models::Page;

/// Routes documents to a page loader based on file extension.
///
/// Anything without a registered extension goes to the PDF loader, which is
/// where path validation happens.
pub struct Dispatcher {
    loaders: HashMap<String, Box<dyn PageLoader>>,
    fallback: PdfLoader,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        let mut loaders: HashMap<String, Box<dyn PageLoader>> = HashMap::new();
        loaders.insert("pdf".into(), Box::new(PdfLoader::new()));
        for ext in &["txt", "text"] {
            loaders.insert((*ext).into(), Box::new(PlaintextLoader::new()));
        }

        Self {
            loaders,
            fallback: PdfLoader::new(),
        }
    }

    fn loader_for(&self, path: &Path) -> &dyn PageLoader {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match ext.and_then(|e| self.loaders.get(&e)) {
            Some(loader) => &**loader,
            None => &self.fallback,
        }
    }
}

impl PageLoader for Dispatcher {
    fn format(&self) -> &'static str {
        "auto"
    }

    fn load(&self, path: &Path) -> Result<Vec<Page>> {
        let loader = self.loader_for(path);
        tracing::debug!(path = %path.display(), format = loader.format(), "loading pages");
        loader.load(path)
    }
}
