//! Runtime types.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A sentence that is both statistically unusual and obligation-like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationCandidate {
    pub sentence: String,
    pub dates: Vec<String>,
}

impl ObligationCandidate {
    /// Text handed to the summarizer: the sentence, a space, then the dates.
    pub fn summary_input(&self) -> String {
        format!("{} {}", self.sentence, self.dates.join(" "))
    }
}

/// All candidates of one source document, in sentence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentCandidates {
    /// Source filename, e.g. `lease.txt`.
    pub document: String,
    pub candidates: Vec<ObligationCandidate>,
}

impl DocumentCandidates {
    pub fn stem(&self) -> &str {
        Path::new(&self.document)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.document)
    }
}

/// Summary of one detection run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub documents: usize,
    pub sentences: usize,
    /// Sentences at or below the threshold.
    pub anomalous: usize,
    pub candidates: usize,
    pub threshold: f64,
}

/// Summary of one summarization pass.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    /// Documents whose events file was written.
    pub documents: usize,
    pub summaries: usize,
    /// One message per document that failed.
    pub failures: Vec<String>,
}

impl SummaryReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
