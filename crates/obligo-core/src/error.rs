//! Error types for Obligo.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Text extraction failed for {path}: {reason}")]
    Extraction { path: String, reason: String },

    #[error("Corpus is empty: no sentences survived segmentation, cannot compute a contamination quantile")]
    EmptyCorpus,

    #[error("No terms remain after pruning terms seen in fewer than {min_df} sentences ({sentences} sentences in corpus)")]
    EmptyVocabulary { min_df: usize, sentences: usize },

    #[error("Summarization error: {0}")]
    Summarize(String),
}

pub type Result<T> = std::result::Result<T, Error>;
