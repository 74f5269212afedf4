use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;

use crate::error::Result;

/// Reason why a file was left out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// File exceeds the configured `max_file_size_mb` limit.
    TooLarge,
    /// Metadata could not be read.
    IoError,
}

/// A file left out of the run, and why.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

/// Documents found under a directory.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Matching files, sorted by path.
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

/// Document scanner that respects .gitignore.
pub struct Scanner {
    root: PathBuf,
    /// Lowercase extensions to pick up.
    extensions: Vec<String>,
    /// Maximum file size in bytes (0 = unlimited).
    max_file_size_bytes: u64,
}

impl Scanner {
    /// Scanner for PDF files with no size limit.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["pdf".into()],
            max_file_size_bytes: 0,
        }
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Skip files larger than `max_size_mb` (0 = unlimited).
    #[must_use]
    pub fn with_max_file_size(mut self, max_size_mb: u32) -> Self {
        self.max_file_size_bytes = u64::from(max_size_mb) * 1024 * 1024;
        self
    }

    /// Walk the root directory and collect matching documents.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut entries: Vec<PathBuf> = WalkBuilder::new(&self.root)
            .hidden(true) // skip hidden dirs like .git
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .follow_links(false) // Prevent symlink loops
            .build()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .filter(|e| self.matches_extension(e.path()))
            .map(ignore::DirEntry::into_path)
            .collect();
        entries.sort();

        let mut result = ScanResult::default();
        for path in entries {
            let size = match path.metadata() {
                Ok(meta) => meta.len(),
                Err(_) => {
                    result.skipped.push(skipped(&path, SkipReason::IoError));
                    continue;
                }
            };
            if self.max_file_size_bytes > 0 && size > self.max_file_size_bytes {
                tracing::info!(path = %path.display(), size, "skipping oversized file");
                result.skipped.push(skipped(&path, SkipReason::TooLarge));
                continue;
            }
            result.files.push(path);
        }

        Ok(result)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

fn skipped(path: &Path, reason: SkipReason) -> SkippedFile {
    SkippedFile {
        path: path.to_string_lossy().replace('\\', "/"),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path, bytes: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![b'%'; bytes]).unwrap();
    }

    #[test]
    fn finds_pdfs_recursively_in_sorted_order() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("b.pdf"), 10);
        touch(&tmp.path().join("a.PDF"), 10);
        touch(&tmp.path().join("nested/c.pdf"), 10);
        touch(&tmp.path().join("notes.txt"), 10);

        let result = Scanner::new(tmp.path()).scan().unwrap();
        let names: Vec<String> = result
            .files
            .iter()
            .map(|p| {
                p.strip_prefix(tmp.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf", "nested/c.pdf"]);
    }

    #[test]
    fn skips_hidden_directories() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join(".cache/hidden.pdf"), 10);
        touch(&tmp.path().join("visible.pdf"), 10);

        let result = Scanner::new(tmp.path()).scan().unwrap();
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn custom_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("dump.txt"), 10);
        touch(&tmp.path().join("doc.pdf"), 10);

        let result = Scanner::new(tmp.path())
            .with_extensions(&[".txt".to_string()])
            .scan()
            .unwrap();
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("dump.txt"));
    }

    #[test]
    fn oversized_files_are_reported() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("big.pdf"), 1024 * 1024 + 1);
        touch(&tmp.path().join("small.pdf"), 10);

        let result = Scanner::new(tmp.path()).with_max_file_size(1).scan().unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].reason, SkipReason::TooLarge);
        assert!(result.skipped[0].path.ends_with("big.pdf"));
    }
}
