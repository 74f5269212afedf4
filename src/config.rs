use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChunkError, Result};
use crate::ingest::{Dispatcher, RecursiveCharacterSplitter};
use crate::processor::{
    DocumentChunker, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_MIN_PAGE_CHARS,
};

/// Config filename looked up in the working directory.
pub const CONFIG_FILE: &str = "pdfchunk.toml";

/// Resolved configuration: where it came from plus the settings themselves.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File the settings were read from, if any.
    pub config_path: Option<PathBuf>,
    /// Settings loaded from the config file, or defaults.
    pub settings: Settings,
}

/// User-configurable settings from pdfchunk.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Chunking configuration.
    pub chunking: ChunkingSettings,
    /// Failure handling.
    pub errors: ErrorSettings,
    /// Directory scanning.
    pub scan: ScanSettings,
    /// Output configuration.
    pub output: OutputSettings,
}

/// How the chunker cuts pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Target maximum characters per chunk.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks of one page.
    pub chunk_overlap: usize,
    /// Pages with fewer cleaned characters are skipped.
    pub min_page_chars: usize,
    /// Separators tried in order; the empty string splits between characters.
    pub separators: Vec<String>,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            min_page_chars: DEFAULT_MIN_PAGE_CHARS,
            separators: vec![" ".into()],
        }
    }
}

/// What to do when a document cannot be processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and carry on with the remaining documents.
    #[default]
    Suppress,
    /// Abort the run with the first failure.
    Propagate,
}

/// Failure handling settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorSettings {
    pub policy: FailurePolicy,
}

/// Directory scanning settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Maximum file size in MB to process (0 = unlimited).
    pub max_file_size_mb: u32,
    /// Extensions picked up when scanning a directory.
    pub extensions: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            extensions: vec!["pdf".into()],
        }
    }
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One minified JSON document.
    #[default]
    Json,
    /// One JSON object per line.
    Jsonl,
    /// Indented JSON.
    Pretty,
}

/// Output-related settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, `pdfchunk.toml` in
    /// the working directory is used when present and valid, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let cwd = std::env::current_dir()
                    .map_err(|e| ChunkError::Config(format!("cannot get cwd: {e}")))?;
                Ok(Self::in_dir(cwd))
            }
        }
    }

    /// Read settings from a specific file, failing on any problem.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChunkError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let settings = toml::from_str(&content).map_err(|e| {
            ChunkError::Config(format!("invalid config {}: {e}", path.display()))
        })?;
        Ok(Self {
            config_path: Some(path.to_path_buf()),
            settings,
        })
    }

    /// Config for a directory, falling back to defaults if its config file is
    /// missing or unreadable.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(CONFIG_FILE);
        match Self::load_settings(&path) {
            Some(settings) => Self {
                config_path: Some(path),
                settings,
            },
            None => Self::default(),
        }
    }

    fn load_settings(config_path: &Path) -> Option<Settings> {
        if !config_path.exists() {
            return None;
        }
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable config");
                return None;
            }
        };
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.settings)
            .map_err(|e| ChunkError::Config(format!("failed to serialize settings: {e}")))
    }

    /// Build a chunker from the chunking settings.
    pub fn build_chunker(&self) -> Result<DocumentChunker> {
        let chunking = &self.settings.chunking;
        let splitter = RecursiveCharacterSplitter::with_separators(
            chunking.chunk_size,
            chunking.chunk_overlap,
            chunking.separators.clone(),
        )?;
        Ok(DocumentChunker::with_parts(Dispatcher::new(), splitter)
            .with_min_page_chars(chunking.min_page_chars))
    }

    /// Check if a file is too large to process based on settings.
    #[must_use]
    pub fn is_file_too_large(&self, size_bytes: u64) -> bool {
        let max_mb = self.settings.scan.max_file_size_mb;
        max_mb > 0 && size_bytes > u64::from(max_mb) * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.chunk_size, 1000);
        assert_eq!(settings.chunking.chunk_overlap, 100);
        assert_eq!(settings.chunking.min_page_chars, 50);
        assert_eq!(settings.chunking.separators, vec![" ".to_string()]);
        assert_eq!(settings.errors.policy, FailurePolicy::Suppress);
        assert_eq!(settings.scan.max_file_size_mb, 100);
        assert_eq!(settings.scan.extensions, vec!["pdf".to_string()]);
        assert_eq!(settings.output.format, OutputFormat::Json);
    }

    #[test]
    fn missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::in_dir(tmp.path());
        assert!(cfg.config_path.is_none());
        assert_eq!(cfg.settings, Settings::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE),
            "[chunking]\nchunk_size = 400\n\n[errors]\npolicy = \"propagate\"\n",
        )
        .unwrap();

        let cfg = Config::in_dir(tmp.path());
        assert_eq!(cfg.config_path, Some(tmp.path().join(CONFIG_FILE)));
        assert_eq!(cfg.settings.chunking.chunk_size, 400);
        assert_eq!(cfg.settings.chunking.chunk_overlap, 100);
        assert_eq!(cfg.settings.errors.policy, FailurePolicy::Propagate);
        assert_eq!(cfg.settings.output.format, OutputFormat::Json);
    }

    #[test]
    fn load_invalid_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "invalid toml {{{{").unwrap();

        let cfg = Config::in_dir(tmp.path());
        assert_eq!(cfg.settings.chunking.chunk_size, 1000);
        assert!(cfg.config_path.is_none());
    }

    #[test]
    fn unreadable_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        // A directory in place of the file exists but cannot be read as text.
        std::fs::create_dir(tmp.path().join(CONFIG_FILE)).unwrap();

        let cfg = Config::in_dir(tmp.path());
        assert!(cfg.config_path.is_none());
        assert_eq!(cfg.settings, Settings::default());
    }

    #[test]
    fn explicit_invalid_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(&path, "[chunking]\nchunk_size = \"big\"\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ChunkError::Config(_))
        ));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(Config::load(Some(missing.as_path())).is_err());
    }

    #[test]
    fn toml_round_trip() {
        let mut cfg = Config::default();
        cfg.settings.chunking.chunk_overlap = 7;
        cfg.settings.output.format = OutputFormat::Jsonl;
        let rendered = cfg.to_toml().unwrap();
        let back: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(back, cfg.settings);
    }

    #[test]
    fn build_chunker_rejects_bad_overlap() {
        let mut cfg = Config::default();
        cfg.settings.chunking.chunk_overlap = 5000;
        assert!(matches!(
            cfg.build_chunker(),
            Err(ChunkError::InvalidChunking { .. })
        ));
    }

    #[test]
    fn build_chunker_applies_splitter_settings() {
        let mut cfg = Config::default();
        cfg.settings.chunking.chunk_size = 300;
        cfg.settings.chunking.chunk_overlap = 30;
        cfg.settings.chunking.separators = vec!["\n".into(), " ".into()];
        let chunker = cfg.build_chunker().unwrap();
        let splitter = chunker.splitter();
        assert_eq!(splitter.chunk_size(), 300);
        assert_eq!(splitter.chunk_overlap(), 30);
        assert_eq!(splitter.separators(), ["\n".to_string(), " ".to_string()]);
    }

    #[test]
    fn build_chunker_applies_min_page_chars() {
        let mut cfg = Config::default();
        cfg.settings.chunking.min_page_chars = 3;
        assert_eq!(cfg.build_chunker().unwrap().min_page_chars(), 3);
    }

    #[test]
    fn is_file_too_large() {
        let mut cfg = Config::default();
        let max_bytes = 100 * 1024 * 1024;
        assert!(!cfg.is_file_too_large(max_bytes));
        assert!(cfg.is_file_too_large(max_bytes + 1));

        cfg.settings.scan.max_file_size_mb = 0;
        assert!(!cfg.is_file_too_large(u64::MAX));
    }
}
