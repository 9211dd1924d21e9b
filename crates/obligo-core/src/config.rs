//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Expected fraction of anomalous sentences in a corpus.
pub const DEFAULT_CONTAMINATION: f64 = 0.10;
/// Sentences with fewer whitespace-delimited tokens are discarded.
pub const DEFAULT_MIN_TOKENS: usize = 4;
/// Seed for the isolation forest so repeated runs select the same sentences.
pub const DEFAULT_SEED: u64 = 42;
/// Number of isolation trees in the ensemble.
pub const DEFAULT_TREES: usize = 100;

/// Paths to all Obligo data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory.
    pub root: PathBuf,
    /// Source PDFs (`pdf/`), searched recursively.
    pub pdf: PathBuf,
    /// Extracted and cleaned text (`text/`).
    pub text: PathBuf,
    /// Per-document candidate collections (`text/json/`).
    pub json: PathBuf,
    /// Per-document summaries (`events/`).
    pub events: PathBuf,
    /// LLM configuration (`llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Derive data paths from a root directory. Does not touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let text = root.join("text");
        Self {
            pdf: root.join("pdf"),
            json: text.join("json"),
            events: root.join("events"),
            llm_config_file: root.join("llm-config.json"),
            text,
            root,
        }
    }

    /// Create the output directories.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.text)?;
        std::fs::create_dir_all(&self.json)?;
        std::fs::create_dir_all(&self.events)?;
        tracing::debug!("Data directories ready under {}", self.root.display());
        Ok(())
    }
}

/// Knobs of the obligation-detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Target outlier fraction; also the quantile used for the threshold.
    pub contamination: f64,
    /// Minimum whitespace-delimited tokens per sentence.
    pub min_tokens: usize,
    pub seed: u64,
    pub trees: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            contamination: DEFAULT_CONTAMINATION,
            min_tokens: DEFAULT_MIN_TOKENS,
            seed: DEFAULT_SEED,
            trees: DEFAULT_TREES,
        }
    }
}

impl DetectionConfig {
    /// Reject values for which the quantile threshold is meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination < 1.0) {
            return Err(Error::Config(format!(
                "contamination must be in (0, 1), got {}",
                self.contamination
            )));
        }
        if self.min_tokens == 0 {
            return Err(Error::Config("min_tokens must be at least 1".into()));
        }
        if self.trees == 0 {
            return Err(Error::Config("trees must be at least 1".into()));
        }
        Ok(())
    }
}

/// Top-level Obligo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObligoConfig {
    pub data_paths: DataPaths,
    pub detection: DetectionConfig,
}

impl ObligoConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        let mut detection = DetectionConfig::default();

        if let Ok(raw) = std::env::var("OBLIGO_CONTAMINATION") {
            detection.contamination = raw.parse().map_err(|_| {
                Error::Config(format!("OBLIGO_CONTAMINATION is not a number: {raw}"))
            })?;
        }
        if let Ok(raw) = std::env::var("OBLIGO_MIN_TOKENS") {
            detection.min_tokens = raw.parse().map_err(|_| {
                Error::Config(format!("OBLIGO_MIN_TOKENS is not an integer: {raw}"))
            })?;
        }
        detection.validate()?;

        Ok(Self {
            data_paths: DataPaths::new(data_dir),
            detection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_layout() {
        let paths = DataPaths::new("/tmp/obligo");
        assert_eq!(paths.pdf, PathBuf::from("/tmp/obligo/pdf"));
        assert_eq!(paths.json, PathBuf::from("/tmp/obligo/text/json"));
        assert_eq!(paths.events, PathBuf::from("/tmp/obligo/events"));
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        paths.ensure_dirs().unwrap();
        assert!(paths.json.is_dir());
        assert!(paths.events.is_dir());
    }

    #[test]
    fn test_default_detection_is_valid() {
        let cfg = DetectionConfig::default();
        assert_eq!(cfg.contamination, 0.10);
        assert_eq!(cfg.min_tokens, 4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_contamination_bounds() {
        for bad in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let cfg = DetectionConfig {
                contamination: bad,
                ..Default::default()
            };
            assert!(matches!(cfg.validate(), Err(Error::Config(_))), "{bad}");
        }
    }
}
