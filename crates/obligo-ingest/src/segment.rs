//! Sentence segmentation.
//!
//! Periods and line breaks both terminate a unit; consecutive terminators
//! collapse into one split point. Units shorter than the token minimum
//! (headings, bullets, page numbers) are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::file::Document;
use obligo_core::config::DEFAULT_MIN_TOKENS;

static TERMINATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.\n]+").unwrap());

/// One segmented unit of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceUnit {
    /// Index of the source document in the run's document list.
    pub document: usize,
    pub text: String,
    /// Position among the surviving units of its document.
    pub position: usize,
}

/// Every sentence of one run, in document order.
pub type Corpus = Vec<SentenceUnit>;

/// Splits text into sentence units.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    pub min_tokens: usize,
}

impl SentenceSegmenter {
    pub fn new(min_tokens: usize) -> Self {
        Self { min_tokens }
    }

    pub fn segment(&self, text: &str) -> Vec<String> {
        TERMINATOR_RE
            .split(text)
            .filter(|unit| unit.split_whitespace().count() >= self.min_tokens)
            .map(|unit| unit.trim().to_string())
            .collect()
    }

    /// Segment every document into one corpus, tagging each unit with its source.
    pub fn segment_documents(&self, documents: &[Document]) -> Corpus {
        let mut corpus = Vec::new();
        for (doc_idx, doc) in documents.iter().enumerate() {
            let units = self.segment(&doc.text);
            if units.is_empty() {
                tracing::debug!("{} contributed no sentences", doc.name);
            }
            corpus.extend(units.into_iter().enumerate().map(|(position, text)| {
                SentenceUnit {
                    document: doc_idx,
                    text,
                    position,
                }
            }));
        }
        corpus
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TOKENS)
    }
}

/// Segment with the default token minimum.
pub fn segment(text: &str) -> Vec<String> {
    SentenceSegmenter::default().segment(text)
}

/// Segment documents with the default token minimum.
pub fn segment_documents(documents: &[Document]) -> Corpus {
    SentenceSegmenter::default().segment_documents(documents)
}
