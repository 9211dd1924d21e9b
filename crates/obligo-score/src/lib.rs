//! Obligo Score — corpus-level anomaly scoring.
//!
//! Scoring is two-phase. `AnomalyScorer::fit` consumes the entire corpus
//! (vocabulary, IDF weights, forest, score offset) and only the resulting
//! `FittedScorer` can produce scores. Nothing is scored until the fit over
//! every sentence has finished, and a fitted scorer is never refitted
//! incrementally: the contamination quantile is a property of the whole
//! corpus.

pub mod forest;
pub mod scorer;
pub mod stopwords;
pub mod tfidf;

pub use forest::{average_path_length, IsolationForest};
pub use scorer::{quantile, AnomalyScorer, FittedScorer, ScoredCorpus};
pub use tfidf::{FittedVectorizer, SparseRow, TfidfVectorizer};
