//! Isolation forest over sparse rows.
//!
//! Each tree is grown on a random subsample (without replacement) of at most
//! 256 rows. A node splits on a feature drawn uniformly among the features
//! that are not constant within the node, at a threshold drawn uniformly in
//! `[min, max)`; rows with `value <= threshold` go left. Growth stops at
//! depth `ceil(log2(subsample))`, at single-row nodes, or when every
//! feature is constant. Anomalous rows are isolated after fewer splits.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tfidf::SparseRow;

pub const DEFAULT_MAX_SAMPLES: usize = 256;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Expected path length of an unsuccessful BST search among `n` points.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn grow(rows: &[SparseRow], sample: Vec<usize>, max_depth: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_node(rows, sample, 0, max_depth, rng);
        tree
    }

    /// Append the subtree for `members` and return its node index.
    fn grow_node(
        &mut self,
        rows: &[SparseRow],
        members: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            size: members.len(),
        });

        if depth >= max_depth || members.len() <= 1 {
            return idx;
        }

        let ranges = feature_ranges(rows, &members);
        let splittable: Vec<(usize, f64, f64)> = ranges
            .into_iter()
            .filter(|(_, (lo, hi))| lo < hi)
            .map(|(f, (lo, hi))| (f, lo, hi))
            .collect();
        if splittable.is_empty() {
            return idx;
        }

        let (feature, lo, hi) = splittable[rng.random_range(0..splittable.len())];
        let threshold = rng.random_range(lo..hi);

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = members
            .into_iter()
            .partition(|&r| rows[r].get(feature) <= threshold);

        let left = self.grow_node(rows, left_rows, depth + 1, max_depth, rng);
        let right = self.grow_node(rows, right_rows, depth + 1, max_depth, rng);
        self.nodes[idx] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        idx
    }

    /// Depth at which `row` lands, plus the expected remaining depth of its leaf.
    fn path_length(&self, row: &SparseRow) -> f64 {
        let mut idx = 0;
        let mut depth = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { size } => return depth as f64 + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row.get(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                    depth += 1;
                }
            }
        }
    }
}

/// Min/max per feature among `members`, counting implicit zeros.
///
/// Only features with at least one stored value are returned; the rest are
/// zero everywhere in the node and therefore constant. Ordered by feature.
fn feature_ranges(rows: &[SparseRow], members: &[usize]) -> BTreeMap<usize, (f64, f64)> {
    let mut stats: BTreeMap<usize, (f64, f64, usize)> = BTreeMap::new();
    for &r in members {
        for (f, v) in rows[r].iter() {
            let entry = stats.entry(f).or_insert((v, v, 0));
            entry.0 = entry.0.min(v);
            entry.1 = entry.1.max(v);
            entry.2 += 1;
        }
    }
    stats
        .into_iter()
        .map(|(f, (lo, hi, present))| {
            if present < members.len() {
                (f, (lo.min(0.0), hi.max(0.0)))
            } else {
                (f, (lo, hi))
            }
        })
        .collect()
}

/// A fitted ensemble of isolation trees.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    max_samples: usize,
}

impl IsolationForest {
    /// Grow `n_trees` trees over `rows` with a seeded generator.
    pub fn fit(rows: &[SparseRow], n_trees: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let max_samples = rows.len().min(DEFAULT_MAX_SAMPLES);
        let max_depth = (max_samples.max(2) as f64).log2().ceil() as usize;

        let trees = (0..n_trees)
            .map(|_| {
                let sample = rand::seq::index::sample(&mut rng, rows.len(), max_samples).into_vec();
                IsolationTree::grow(rows, sample, max_depth, &mut rng)
            })
            .collect();

        tracing::debug!(
            "Fitted isolation forest: {} trees, {} samples per tree, max depth {}",
            n_trees,
            max_samples,
            max_depth
        );
        Self { trees, max_samples }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean path length of `row` across the ensemble.
    pub fn mean_path_length(&self, row: &SparseRow) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.path_length(row)).sum::<f64>() / self.trees.len() as f64
    }

    /// Opposite of the anomaly score: in `[-1, 0)`, lower is more anomalous.
    pub fn score_sample(&self, row: &SparseRow) -> f64 {
        let norm = average_path_length(self.max_samples);
        let ratio = if norm > 0.0 {
            self.mean_path_length(row) / norm
        } else {
            0.0
        };
        -(2f64.powf(-ratio))
    }

    pub fn score_samples(&self, rows: &[SparseRow]) -> Vec<f64> {
        rows.iter().map(|r| self.score_sample(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(usize, f64)]) -> SparseRow {
        SparseRow {
            indices: pairs.iter().map(|p| p.0).collect(),
            values: pairs.iter().map(|p| p.1).collect(),
        }
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        let c256 = average_path_length(256);
        assert!((c256 - 10.244_770_920_540_3).abs() < 1e-6, "{c256}");
    }

    #[test]
    fn test_outlier_scores_lowest() {
        let mut rows: Vec<SparseRow> = (0..50).map(|_| row(&[(0, 1.0)])).collect();
        rows.push(row(&[(1, 1.0)]));
        let forest = IsolationForest::fit(&rows, 100, 42);
        let scores = forest.score_samples(&rows);
        let outlier = scores[50];
        assert!(scores[..50].iter().all(|&s| s > outlier));
    }

    #[test]
    fn test_seeded_fit_is_deterministic() {
        let rows: Vec<SparseRow> = (0..30)
            .map(|i| row(&[(i % 4, 0.5), (4 + i % 3, (i as f64) / 30.0)]))
            .collect();
        let a = IsolationForest::fit(&rows, 20, 7).score_samples(&rows);
        let b = IsolationForest::fit(&rows, 20, 7).score_samples(&rows);
        assert_eq!(a, b);
    }

    #[test]
    fn test_constant_rows_do_not_split() {
        let rows: Vec<SparseRow> = (0..10).map(|_| row(&[(3, 0.7)])).collect();
        let forest = IsolationForest::fit(&rows, 5, 1);
        let expected = average_path_length(10);
        assert!((forest.mean_path_length(&rows[0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_feature_ranges_include_implicit_zero() {
        let rows = vec![row(&[(0, 0.5)]), row(&[(0, 0.9), (2, 0.1)])];
        let ranges = feature_ranges(&rows, &[0, 1]);
        assert_eq!(ranges[&0], (0.5, 0.9));
        assert_eq!(ranges[&2], (0.0, 0.1));
    }
}
