//! Corpus-level anomaly scoring with a contamination-quantile threshold.

use obligo_core::{DetectionConfig, Error, Result};
use serde::Serialize;

use crate::forest::IsolationForest;
use crate::tfidf::{FittedVectorizer, TfidfVectorizer};

/// Linear-interpolation quantile of `values` at `q` in `[0, 1]`.
///
/// Returns `None` for an empty slice. NaN values sort last.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Scoring settings; nothing is learned until `fit`.
#[derive(Debug, Clone)]
pub struct AnomalyScorer {
    contamination: f64,
    trees: usize,
    seed: u64,
    vectorizer: TfidfVectorizer,
}

impl AnomalyScorer {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            contamination: config.contamination,
            trees: config.trees,
            seed: config.seed,
            vectorizer: TfidfVectorizer::default(),
        }
    }

    /// Learn vocabulary, forest, and score offset from the whole corpus.
    pub fn fit(&self, sentences: &[&str]) -> Result<FittedScorer> {
        if sentences.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let (vectorizer, rows) = self.vectorizer.fit_transform(sentences)?;
        let forest = IsolationForest::fit(&rows, self.trees, self.seed);
        let raw = forest.score_samples(&rows);
        let offset = quantile(&raw, self.contamination).ok_or(Error::EmptyCorpus)?;

        tracing::info!(
            "Fitted anomaly scorer on {} sentences ({} terms, {} trees)",
            sentences.len(),
            vectorizer.n_features(),
            forest.n_trees()
        );

        Ok(FittedScorer {
            contamination: self.contamination,
            vectorizer,
            forest,
            offset,
        })
    }

    /// Fit on `sentences` and score the same sentences.
    pub fn fit_score(&self, sentences: &[&str]) -> Result<ScoredCorpus> {
        self.fit(sentences)?.score(sentences)
    }
}

/// A scorer bound to the corpus it was fitted on.
#[derive(Debug, Clone)]
pub struct FittedScorer {
    contamination: f64,
    vectorizer: FittedVectorizer,
    forest: IsolationForest,
    offset: f64,
}

impl FittedScorer {
    /// Decision score per sentence (lower = more anomalous) and the threshold τ.
    pub fn score(&self, sentences: &[&str]) -> Result<ScoredCorpus> {
        let rows = self.vectorizer.transform(sentences);
        let scores: Vec<f64> = self
            .forest
            .score_samples(&rows)
            .into_iter()
            .map(|s| s - self.offset)
            .collect();
        let threshold = quantile(&scores, self.contamination).ok_or(Error::EmptyCorpus)?;

        let scored = ScoredCorpus { scores, threshold };
        tracing::debug!(
            "Threshold {:.6} selects {} of {} sentences",
            threshold,
            scored.selected_count(),
            scored.len()
        );
        Ok(scored)
    }
}

/// Per-sentence scores aligned with the corpus, plus the selection threshold.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCorpus {
    pub scores: Vec<f64>,
    pub threshold: f64,
}

impl ScoredCorpus {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Whether sentence `i` falls at or below the threshold.
    pub fn is_selected(&self, i: usize) -> bool {
        self.scores
            .get(i)
            .is_some_and(|&s| s <= self.threshold)
    }

    pub fn selected_count(&self) -> usize {
        self.scores.iter().filter(|&&s| s <= self.threshold).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(contamination: f64) -> DetectionConfig {
        DetectionConfig {
            contamination,
            ..DetectionConfig::default()
        }
    }

    fn corpus() -> Vec<String> {
        let mut sentences: Vec<String> = (0..40)
            .map(|i| format!("the tenant pays monthly rent for unit {}", i % 5))
            .collect();
        sentences.push("landlord must repair the roof before winter season".to_string());
        sentences.push("landlord must repair the furnace before winter season".to_string());
        sentences
    }

    #[test]
    fn test_quantile_linear() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert!((quantile(&values, 0.1).unwrap() - 1.3).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_quantile_selection_count() {
        for n in [10usize, 37, 100, 513] {
            for c in [0.05, 0.1, 0.25] {
                let values: Vec<f64> = (0..n).map(|i| ((i * 7919) % n) as f64).collect();
                let tau = quantile(&values, c).unwrap();
                let selected = values.iter().filter(|&&v| v <= tau).count() as f64;
                let expected = (c * n as f64).floor();
                assert!((selected - expected).abs() <= 1.0, "n={n} c={c} got {selected}");
            }
        }
    }

    /// `n` distinct four-word sentences whose words each recur across the corpus.
    fn varied_corpus(n: usize) -> Vec<String> {
        const PARTIES: [&str; 3] = ["tenant", "landlord", "lender"];
        const ACTIONS: [&str; 4] = ["pays", "repairs", "insures", "inspects"];
        const OBJECTS: [&str; 5] = ["roof", "deposit", "invoice", "garden", "boiler"];
        const CADENCE: [&str; 7] = [
            "monthly", "yearly", "weekly", "daily", "quarterly", "promptly", "annually",
        ];
        (0..n)
            .map(|i| {
                format!(
                    "{} {} {} {}",
                    PARTIES[i % 3],
                    ACTIONS[i % 4],
                    OBJECTS[i % 5],
                    CADENCE[i % 7]
                )
            })
            .collect()
    }

    #[test]
    fn test_selection_fraction_tracks_contamination() {
        for n in [10usize, 20, 50, 100] {
            let sentences = varied_corpus(n);
            let refs: Vec<&str> = sentences.iter().map(|s| s.as_str()).collect();
            for c in [0.1, 0.2] {
                let scored = AnomalyScorer::new(&config(c)).fit_score(&refs).unwrap();
                let selected = scored.selected_count() as f64;
                let expected = (c * n as f64).floor();
                assert!(selected >= 1.0, "n={n} c={c}");
                assert!((selected - expected).abs() <= 1.0, "n={n} c={c} got {selected}");
            }
        }
    }

    #[test]
    fn test_rare_sentences_score_lowest() {
        let sentences = corpus();
        let refs: Vec<&str> = sentences.iter().map(|s| s.as_str()).collect();
        let scored = AnomalyScorer::new(&config(0.1)).fit_score(&refs).unwrap();

        assert_eq!(scored.len(), refs.len());
        let common_min = scored.scores[..40]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        assert!(scored.scores[40] < common_min);
        assert!(scored.scores[41] < common_min);
        assert!(scored.is_selected(40));
        assert!(scored.is_selected(41));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let sentences = corpus();
        let refs: Vec<&str> = sentences.iter().map(|s| s.as_str()).collect();
        let scorer = AnomalyScorer::new(&config(0.1));
        let a = scorer.fit_score(&refs).unwrap();
        let b = scorer.fit_score(&refs).unwrap();
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.threshold, b.threshold);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        let scorer = AnomalyScorer::new(&config(0.1));
        assert!(matches!(scorer.fit(&[]), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_is_selected_out_of_range() {
        let scored = ScoredCorpus {
            scores: vec![-0.2, 0.1],
            threshold: 0.0,
        };
        assert!(scored.is_selected(0));
        assert!(!scored.is_selected(1));
        assert!(!scored.is_selected(5));
        assert_eq!(scored.selected_count(), 1);
    }
}
