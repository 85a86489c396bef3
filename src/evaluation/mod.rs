//! Feature evaluation
//!
//! Scores a feature matrix with the task's model: standardize, then k-fold
//! cross-validate. A candidate is scored by appending it as one extra column
//! to the base features.

use crate::error::{AutoFeError, Result};
use crate::preprocessing::StandardScaler;
use crate::task::{get_model_and_scoring, ModelSpec, TaskType};
use crate::training::{cross_val_score, CVResults, CVStrategy, CrossValidator};
use ndarray::{concatenate, Array1, Array2, ArrayView1, Axis};
use tracing::trace;

/// Number of folds used unless configured otherwise
pub const DEFAULT_CV_FOLDS: usize = 5;

/// Scores feature sets for one task
#[derive(Debug, Clone)]
pub struct FeatureEvaluator {
    task_type: TaskType,
    spec: ModelSpec,
    cv_folds: usize,
}

impl FeatureEvaluator {
    pub fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
            spec: get_model_and_scoring(task_type),
            cv_folds: DEFAULT_CV_FOLDS,
        }
    }

    pub fn with_cv_folds(mut self, cv_folds: usize) -> Self {
        self.cv_folds = cv_folds;
        self
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn model_spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Unshuffled K-fold for regression, unshuffled stratified K-fold for classification
    fn cross_validator(&self) -> CrossValidator {
        let strategy = match self.task_type {
            TaskType::Regression => CVStrategy::KFold {
                n_splits: self.cv_folds,
                shuffle: false,
            },
            TaskType::Classification => CVStrategy::StratifiedKFold {
                n_splits: self.cv_folds,
                shuffle: false,
            },
        };
        CrossValidator::new(strategy)
    }

    /// Cross-validated score of the task's model on `x` as given
    pub fn evaluate_baseline(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<CVResults> {
        self.score_matrix(x, y)
    }

    /// Cross-validated score of `x_base` with `feature` appended as the last column
    pub fn evaluate_feature<'a>(
        &self,
        x_base: &'a Array2<f64>,
        feature: ArrayView1<'a, f64>,
        y: &Array1<f64>,
    ) -> Result<CVResults> {
        if feature.len() != x_base.nrows() {
            return Err(AutoFeError::ShapeError {
                expected: format!("{} rows", x_base.nrows()),
                actual: format!("{} rows", feature.len()),
            });
        }

        let column = feature.insert_axis(Axis(1));
        let x_new = concatenate(Axis(1), &[x_base.view(), column])?;
        self.score_matrix(&x_new, y)
    }

    fn score_matrix(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<CVResults> {
        if x.nrows() != y.len() {
            return Err(AutoFeError::ShapeError {
                expected: format!("{} target values", x.nrows()),
                actual: format!("{} target values", y.len()),
            });
        }

        let x_scaled = StandardScaler::new().fit_transform(x)?;
        let cv = self.cross_validator();
        let scoring = self.spec.scoring;
        let model_kind = &self.spec.model;

        let results = cross_val_score(&x_scaled, y, &cv, |x_train, y_train, x_test, y_test| {
            let mut model = model_kind.build();
            model.fit(x_train, y_train)?;
            let predictions = model.predict(x_test)?;
            Ok(scoring.score(y_test, &predictions))
        })?;

        trace!(
            n_features = x.ncols(),
            mean = results.mean_score,
            std = results.std_score,
            "Scored feature matrix"
        );
        Ok(results)
    }
}

/// Cross-validated (mean, std) score of the base features plus one candidate
pub fn evaluate_feature(
    x_base: &Array2<f64>,
    feature: &Array1<f64>,
    y: &Array1<f64>,
    task_type: TaskType,
) -> Result<CVResults> {
    FeatureEvaluator::new(task_type).evaluate_feature(x_base, feature.view(), y)
}

/// Cross-validated score of the base features alone
pub fn evaluate_baseline(x: &Array2<f64>, y: &Array1<f64>, task_type: TaskType) -> Result<CVResults> {
    FeatureEvaluator::new(task_type).evaluate_baseline(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn sqrt_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 1), |(i, _)| (i + 1) as f64);
        let y = x.column(0).mapv(|v| v.sqrt() * 3.0 + 1.0);
        (x, y)
    }

    #[test]
    fn test_baseline_on_linear_data() {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| {
            if j == 0 {
                i as f64
            } else {
                ((i * 7) % 11) as f64
            }
        });
        let y = x.column(0).mapv(|v| 2.0 * v + 1.0) - &x.column(1);

        let results = evaluate_baseline(&x, &y, TaskType::Regression).unwrap();
        assert_eq!(results.n_folds, 5);
        assert!(results.mean_score > 0.999, "r2 = {}", results.mean_score);
    }

    #[test]
    fn test_matching_candidate_improves_score() {
        let (x, y) = sqrt_data(60);
        let baseline = evaluate_baseline(&x, &y, TaskType::Regression).unwrap();
        let feature = x.column(0).mapv(f64::sqrt);
        let with_sqrt = evaluate_feature(&x, &feature, &y, TaskType::Regression).unwrap();

        assert!(with_sqrt.mean_score > baseline.mean_score);
        assert!(with_sqrt.mean_score > 0.999);
    }

    #[test]
    fn test_feature_view_of_base_column() {
        let (x, y) = sqrt_data(60);
        let evaluator = FeatureEvaluator::new(TaskType::Regression);

        // Candidate borrowed straight from the base matrix: a duplicate column
        let duplicate = evaluator.evaluate_feature(&x, x.column(0), &y).unwrap();
        let baseline = evaluator.evaluate_baseline(&x, &y).unwrap();
        assert!((duplicate.mean_score - baseline.mean_score).abs() < 1e-6);
    }

    #[test]
    fn test_row_mismatch_is_shape_error() {
        let (x, y) = sqrt_data(20);
        let feature = Array1::zeros(19);
        let err = evaluate_feature(&x, &feature, &y, TaskType::Regression).unwrap_err();
        assert!(matches!(err, AutoFeError::ShapeError { .. }));
    }

    #[test]
    fn test_classification_scores_are_accuracies() {
        let n = 50;
        let x = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(n, |i| if i % 2 == 0 { 0.0 } else { 1.0 });

        let results = evaluate_baseline(&x, &y, TaskType::Classification).unwrap();
        assert_eq!(results.n_folds, 5);
        for score in &results.scores {
            assert!((0.0..=1.0).contains(score));
        }

        let parity = y.clone();
        let improved = evaluate_feature(&x, &parity, &y, TaskType::Classification).unwrap();
        assert_eq!(improved.mean_score, 1.0);
    }

    #[test]
    fn test_custom_fold_count() {
        let (x, y) = sqrt_data(30);
        let evaluator = FeatureEvaluator::new(TaskType::Regression).with_cv_folds(3);
        let results = evaluator.evaluate_baseline(&x, &y).unwrap();
        assert_eq!(results.n_folds, 3);
        assert_eq!(evaluator.model_spec().metric_label, "R2");
    }
}
