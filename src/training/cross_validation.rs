//! Fold splitting and cross-validated scoring

use crate::error::{AutoFeError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How rows are dealt into folds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CVStrategy {
    /// Contiguous blocks of rows
    KFold { n_splits: usize, shuffle: bool },
    /// Every fold keeps the label proportions of the whole target
    StratifiedKFold { n_splits: usize, shuffle: bool },
}

impl Default for CVStrategy {
    fn default() -> Self {
        CVStrategy::KFold { n_splits: 5, shuffle: false }
    }
}

impl CVStrategy {
    pub fn n_splits(&self) -> usize {
        match self {
            CVStrategy::KFold { n_splits, .. } | CVStrategy::StratifiedKFold { n_splits, .. } => {
                *n_splits
            }
        }
    }
}

/// Row indices of one fold: the held-out rows and everything else
#[derive(Debug, Clone)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Produces the folds for a [`CVStrategy`]
#[derive(Debug, Clone)]
pub struct CrossValidator {
    strategy: CVStrategy,
    random_state: Option<u64>,
}

impl CrossValidator {
    pub fn new(strategy: CVStrategy) -> Self {
        Self {
            strategy,
            random_state: None,
        }
    }

    /// Fix the shuffle seed
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn strategy(&self) -> &CVStrategy {
        &self.strategy
    }

    /// Split `n_samples` rows. Stratified strategies need the target.
    pub fn split(&self, n_samples: usize, y: Option<&Array1<f64>>) -> Result<Vec<CVSplit>> {
        let n_splits = self.strategy.n_splits();
        if n_splits < 2 {
            return Err(AutoFeError::InvalidParameter {
                name: "n_splits".to_string(),
                value: n_splits.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        if n_samples < n_splits {
            return Err(AutoFeError::ComputationError(format!(
                "n_samples ({}) must be >= n_splits ({})",
                n_samples, n_splits
            )));
        }

        match &self.strategy {
            CVStrategy::KFold { shuffle, .. } => Ok(self.k_fold_split(n_samples, n_splits, *shuffle)),
            CVStrategy::StratifiedKFold { shuffle, .. } => {
                let y = y.ok_or_else(|| {
                    AutoFeError::ConfigError("StratifiedKFold requires target array".to_string())
                })?;
                if y.len() != n_samples {
                    return Err(AutoFeError::ShapeError {
                        expected: format!("y length = {}", n_samples),
                        actual: format!("y length = {}", y.len()),
                    });
                }
                Ok(self.stratified_k_fold_split(y, n_splits, *shuffle))
            }
        }
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    fn k_fold_split(&self, n_samples: usize, n_splits: usize, shuffle: bool) -> Vec<CVSplit> {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        if shuffle {
            indices.shuffle(&mut self.rng());
        }

        // The first n_samples % n_splits folds take one extra row
        let (base, extra) = (n_samples / n_splits, n_samples % n_splits);
        let bounds: Vec<usize> = std::iter::once(0)
            .chain((0..n_splits).scan(0, |end, fold| {
                *end += base + usize::from(fold < extra);
                Some(*end)
            }))
            .collect();

        bounds
            .windows(2)
            .enumerate()
            .map(|(fold_idx, w)| {
                let (start, end) = (w[0], w[1]);
                let mut train_indices = indices[..start].to_vec();
                train_indices.extend_from_slice(&indices[end..]);
                CVSplit {
                    train_indices,
                    test_indices: indices[start..end].to_vec(),
                    fold_idx,
                }
            })
            .collect()
    }

    fn stratified_k_fold_split(&self, y: &Array1<f64>, n_splits: usize, shuffle: bool) -> Vec<CVSplit> {
        // Classes in order of first appearance, rows in row order
        let mut classes: Vec<(u64, Vec<usize>)> = Vec::new();
        for (row, &label) in y.iter().enumerate() {
            let key = label.to_bits();
            match classes.iter_mut().find(|(k, _)| *k == key) {
                Some((_, rows)) => rows.push(row),
                None => classes.push((key, vec![row])),
            }
        }

        if shuffle {
            let mut rng = self.rng();
            for (_, rows) in classes.iter_mut() {
                rows.shuffle(&mut rng);
            }
        }

        // Fold sizes per class come from dealing the label-sorted target
        // round-robin; each class then fills its folds in contiguous blocks.
        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); n_splits];
        let mut start = 0;
        for (_, rows) in &classes {
            let end = start + rows.len();
            let mut remaining = rows.as_slice();
            for (fold_idx, fold) in folds.iter_mut().enumerate() {
                let take =
                    dealt_before(end, fold_idx, n_splits) - dealt_before(start, fold_idx, n_splits);
                let (block, rest) = remaining.split_at(take);
                fold.extend_from_slice(block);
                remaining = rest;
            }
            start = end;
        }
        for fold in &mut folds {
            fold.sort_unstable();
        }

        (0..n_splits)
            .map(|fold_idx| {
                let mut train_indices: Vec<usize> = Vec::with_capacity(y.len());
                for (other, rows) in folds.iter().enumerate() {
                    if other != fold_idx {
                        train_indices.extend_from_slice(rows);
                    }
                }
                train_indices.sort_unstable();
                CVSplit {
                    train_indices,
                    test_indices: folds[fold_idx].clone(),
                    fold_idx,
                }
            })
            .collect()
    }
}

/// How many of the positions `0..end` land on `fold` when dealt round-robin
fn dealt_before(end: usize, fold: usize, n_splits: usize) -> usize {
    end / n_splits + usize::from(fold < end % n_splits)
}

/// Fold scores and their summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CVResults {
    pub scores: Vec<f64>,
    /// Mean over folds
    pub mean_score: f64,
    /// Population standard deviation over folds
    pub std_score: f64,
    pub n_folds: usize,
}

impl CVResults {
    pub fn from_scores(scores: Vec<f64>) -> Self {
        let n_folds = scores.len();
        if n_folds == 0 {
            return Self {
                scores,
                mean_score: f64::NAN,
                std_score: f64::NAN,
                n_folds,
            };
        }
        let n = n_folds as f64;
        let mean_score = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean_score) * (s - mean_score)).sum::<f64>() / n;

        Self {
            scores,
            mean_score,
            std_score: variance.sqrt(),
            n_folds,
        }
    }
}

/// Score a model on every split.
///
/// `fit_score` receives `(x_train, y_train, x_test, y_test)` and returns the
/// held-out score of a freshly fitted model. The first failing fold aborts.
pub fn cross_val_score<F>(
    x: &Array2<f64>,
    y: &Array1<f64>,
    cv: &CrossValidator,
    mut fit_score: F,
) -> Result<CVResults>
where
    F: FnMut(&Array2<f64>, &Array1<f64>, &Array2<f64>, &Array1<f64>) -> Result<f64>,
{
    if x.nrows() != y.len() {
        return Err(AutoFeError::ShapeError {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }

    let splits = cv.split(x.nrows(), Some(y))?;
    let mut scores = Vec::with_capacity(splits.len());

    for split in &splits {
        let x_train = x.select(Axis(0), &split.train_indices);
        let y_train = y.select(Axis(0), &split.train_indices);
        let x_test = x.select(Axis(0), &split.test_indices);
        let y_test = y.select(Axis(0), &split.test_indices);

        let score = fit_score(&x_train, &y_train, &x_test, &y_test)?;
        if !score.is_finite() {
            return Err(AutoFeError::ComputationError(format!(
                "fold {} produced a non-finite score",
                split.fold_idx
            )));
        }
        scores.push(score);
    }

    Ok(CVResults::from_scores(scores))
}
