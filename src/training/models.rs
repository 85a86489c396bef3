//! Model selection and the fit/score contract used by cross-validation

use crate::error::Result;
use super::linear_models::{LinearRegression, LogisticRegression};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Which estimator to build for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelKind {
    /// Ordinary least squares
    LinearRegression,
    /// L2-regularized logistic regression trained by gradient descent
    LogisticRegression { max_iter: usize, random_state: u64 },
}

impl ModelKind {
    /// Human-readable model name
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::LinearRegression => "Linear Regression",
            ModelKind::LogisticRegression { .. } => "Logistic Regression",
        }
    }

    /// Build a fresh, unfitted estimator
    pub fn build(&self) -> TaskModel {
        match self {
            ModelKind::LinearRegression => TaskModel::LinearRegression(LinearRegression::new()),
            ModelKind::LogisticRegression { max_iter, random_state } => TaskModel::LogisticRegression(
                LogisticRegression::new()
                    .with_max_iter(*max_iter)
                    .with_random_state(*random_state),
            ),
        }
    }
}

/// A fitted-or-unfitted estimator of either kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TaskModel {
    LinearRegression(LinearRegression),
    LogisticRegression(LogisticRegression),
}

impl TaskModel {
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            TaskModel::LinearRegression(m) => m.fit(x, y).map(|_| ()),
            TaskModel::LogisticRegression(m) => m.fit(x, y).map(|_| ()),
        }
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            TaskModel::LinearRegression(m) => m.predict(x),
            TaskModel::LogisticRegression(m) => m.predict(x),
        }
    }

    /// Native score: R² for regression, accuracy for classification
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        match self {
            TaskModel::LinearRegression(m) => m.score(x, y),
            TaskModel::LogisticRegression(m) => m.score(x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_build_matches_kind() {
        let model = ModelKind::LinearRegression.build();
        assert!(matches!(model, TaskModel::LinearRegression(_)));

        let model = ModelKind::LogisticRegression { max_iter: 1000, random_state: 42 }.build();
        match model {
            TaskModel::LogisticRegression(m) => {
                assert_eq!(m.max_iter, 1000);
                assert_eq!(m.random_state, Some(42));
            }
            other => panic!("unexpected model {:?}", other),
        }
    }

    #[test]
    fn test_task_model_fit_score() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let mut model = ModelKind::LinearRegression.build();
        model.fit(&x, &y).unwrap();
        assert!((model.score(&x, &y).unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(model.predict(&x).unwrap().len(), 4);
    }
}
