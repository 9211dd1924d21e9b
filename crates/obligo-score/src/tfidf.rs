//! Sparse TF-IDF representation over unigrams and bigrams.
//!
//! Tokens are runs of two or more word characters, lower-cased. Stop words
//! are removed before bigrams are formed, so "pay the rent" yields the
//! bigram "pay rent". Terms seen in fewer than `min_df` sentences are
//! dropped. Weights are `tf * (ln((1 + n) / (1 + df)) + 1)`, and each row
//! is scaled to unit L2 norm.

use std::collections::{BTreeMap, BTreeSet};

use obligo_core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::stopwords::is_stop_word;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

pub const DEFAULT_MIN_DF: usize = 2;

/// A sparse vector; `indices` are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseRow {
    /// Value of feature `feature`, zero when absent.
    pub fn get(&self, feature: usize) -> f64 {
        match self.indices.binary_search(&feature) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

/// Unfitted vectorizer settings.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    pub min_df: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            min_df: DEFAULT_MIN_DF,
        }
    }
}

/// Vocabulary and IDF weights learned from one corpus.
#[derive(Debug, Clone)]
pub struct FittedVectorizer {
    /// Term → column, columns in lexical term order.
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
}

/// Unigrams and bigrams of a sentence after stop-word removal.
pub fn analyze(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .collect();

    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}

impl TfidfVectorizer {
    pub fn new(min_df: usize) -> Self {
        Self { min_df }
    }

    /// Learn the vocabulary and IDF weights of `sentences`.
    pub fn fit(&self, sentences: &[&str]) -> Result<FittedVectorizer> {
        if sentences.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for sentence in sentences {
            let unique: BTreeSet<String> = analyze(sentence).into_iter().collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n = sentences.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::new();
        for (term, count) in df.into_iter().filter(|(_, c)| *c >= self.min_df) {
            vocabulary.insert(term, idf.len());
            idf.push(((1.0 + n) / (1.0 + count as f64)).ln() + 1.0);
        }

        if vocabulary.is_empty() {
            return Err(Error::EmptyVocabulary {
                min_df: self.min_df,
                sentences: sentences.len(),
            });
        }

        tracing::debug!(
            "Fitted vocabulary of {} terms over {} sentences",
            vocabulary.len(),
            sentences.len()
        );
        Ok(FittedVectorizer { vocabulary, idf })
    }

    pub fn fit_transform(&self, sentences: &[&str]) -> Result<(FittedVectorizer, Vec<SparseRow>)> {
        let fitted = self.fit(sentences)?;
        let rows = fitted.transform(sentences);
        Ok((fitted, rows))
    }
}

impl FittedVectorizer {
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Vectorize one sentence; unknown terms are ignored.
    pub fn transform_one(&self, sentence: &str) -> SparseRow {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in analyze(sentence) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut row = SparseRow::default();
        for (col, tf) in counts {
            row.indices.push(col);
            row.values.push(tf * self.idf[col]);
        }

        let norm = row.values.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut row.values {
                *v /= norm;
            }
        }
        row
    }

    pub fn transform(&self, sentences: &[&str]) -> Vec<SparseRow> {
        sentences.iter().map(|s| self.transform_one(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_drops_stop_words_before_bigrams() {
        assert_eq!(analyze("Pay the rent"), vec!["pay", "rent", "pay rent"]);
    }

    #[test]
    fn test_analyze_single_char_tokens_ignored() {
        assert_eq!(analyze("a b tenant"), vec!["tenant"]);
    }

    #[test]
    fn test_min_df_prunes_rare_terms() {
        let corpus = ["tenant pays rent", "tenant pays deposit", "landlord repairs roof"];
        let fitted = TfidfVectorizer::default().fit(&corpus).unwrap();
        let terms: Vec<&str> = fitted.vocabulary.keys().map(|s| s.as_str()).collect();
        assert_eq!(terms, vec!["pays", "tenant", "tenant pays"]);
    }

    #[test]
    fn test_idf_formula() {
        let corpus = ["alpha beta", "alpha beta", "alpha gamma"];
        let fitted = TfidfVectorizer::default().fit(&corpus).unwrap();
        let alpha = fitted.idf[fitted.vocabulary["alpha"]];
        let beta = fitted.idf[fitted.vocabulary["beta"]];
        assert!((alpha - 1.0).abs() < 1e-12);
        assert!((beta - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_unit_norm() {
        let corpus = ["tenant pays rent", "tenant pays deposit", "landlord repairs roof"];
        let (_, rows) = TfidfVectorizer::default().fit_transform(&corpus).unwrap();
        let norm: f64 = rows[0].values.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        // No surviving terms: all-zero row.
        assert_eq!(rows[2].nnz(), 0);
        assert_eq!(rows[2].get(0), 0.0);
    }

    #[test]
    fn test_empty_corpus() {
        assert!(matches!(TfidfVectorizer::default().fit(&[]), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_empty_vocabulary() {
        let err = TfidfVectorizer::default().fit(&["alpha", "beta"]).unwrap_err();
        assert!(matches!(err, Error::EmptyVocabulary { min_df: 2, sentences: 2 }));
    }
}
