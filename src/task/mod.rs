//! Task detection
//!
//! Picks classification or regression from the target's cardinality and maps
//! each task to the model and metric used for the whole run.

use crate::training::{accuracy_score, r2_score, ModelKind};
use crate::utils::n_distinct;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Seed fixed on the classification model
pub const CLASSIFIER_SEED: u64 = 42;

/// Iteration cap of the classification model
pub const CLASSIFIER_MAX_ITER: usize = 1000;

/// Type of ML task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Binary classification
    Classification,
    /// Regression
    Regression,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Classification => write!(f, "classification"),
            TaskType::Regression => write!(f, "regression"),
        }
    }
}

/// Scoring metric applied to each fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
    Accuracy,
    R2,
}

impl Scoring {
    /// Scorer name as used in configuration (`"accuracy"`, `"r2"`)
    pub fn name(&self) -> &'static str {
        match self {
            Scoring::Accuracy => "accuracy",
            Scoring::R2 => "r2",
        }
    }

    /// Score held-out predictions
    pub fn score(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        match self {
            Scoring::Accuracy => accuracy_score(y_true, y_pred),
            Scoring::R2 => r2_score(y_true, y_pred),
        }
    }
}

/// Model, scorer and display label for a task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSpec {
    pub model: ModelKind,
    pub scoring: Scoring,
    pub metric_label: &'static str,
}

/// Classification iff the target has exactly two distinct values.
///
/// Logs which model will be used and why.
pub fn detect_task_type(target: &Array1<f64>) -> TaskType {
    let n_unique = n_distinct(target);

    if n_unique == 2 {
        info!(
            classes = n_unique,
            model = "Logistic Regression",
            why = "Good for learning how features affect binary outcomes",
            "Detected: Binary Classification"
        );
        TaskType::Classification
    } else {
        info!(
            unique_values = n_unique,
            model = "Linear Regression",
            why = "Good for learning how features affect continuous outcomes",
            "Detected: Regression"
        );
        TaskType::Regression
    }
}

/// Model and metric for a task
pub fn get_model_and_scoring(task_type: TaskType) -> ModelSpec {
    match task_type {
        TaskType::Classification => ModelSpec {
            model: ModelKind::LogisticRegression {
                max_iter: CLASSIFIER_MAX_ITER,
                random_state: CLASSIFIER_SEED,
            },
            scoring: Scoring::Accuracy,
            metric_label: "Accuracy",
        },
        TaskType::Regression => ModelSpec {
            model: ModelKind::LinearRegression,
            scoring: Scoring::R2,
            metric_label: "R2",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_two_values_is_classification() {
        assert_eq!(detect_task_type(&array![0.0, 1.0, 1.0, 0.0]), TaskType::Classification);
        assert_eq!(detect_task_type(&array![3.0, 7.0, 7.0]), TaskType::Classification);
    }

    #[test]
    fn test_other_cardinalities_are_regression() {
        assert_eq!(detect_task_type(&array![0.0, 1.0, 2.0]), TaskType::Regression);
        assert_eq!(detect_task_type(&array![1.5, 2.5, 3.5, 4.5]), TaskType::Regression);
        // A constant target falls through to regression here; the validator rejects it earlier
        assert_eq!(detect_task_type(&array![1.0, 1.0]), TaskType::Regression);
    }

    #[test]
    fn test_model_and_scoring() {
        let spec = get_model_and_scoring(TaskType::Classification);
        assert_eq!(spec.scoring.name(), "accuracy");
        assert_eq!(spec.metric_label, "Accuracy");
        assert_eq!(
            spec.model,
            ModelKind::LogisticRegression { max_iter: 1000, random_state: 42 }
        );

        let spec = get_model_and_scoring(TaskType::Regression);
        assert_eq!(spec.scoring.name(), "r2");
        assert_eq!(spec.metric_label, "R2");
        assert_eq!(spec.model, ModelKind::LinearRegression);
    }

    #[test]
    fn test_scoring_dispatch() {
        let y = array![1.0, 0.0, 1.0, 1.0];
        let pred = array![1.0, 0.0, 0.0, 1.0];
        assert_eq!(Scoring::Accuracy.score(&y, &pred), 0.75);
        assert_eq!(Scoring::R2.score(&y, &y), 1.0);
    }

    #[test]
    fn test_task_type_serialize() {
        let json = serde_json::to_string(&TaskType::Regression).unwrap();
        assert_eq!(json, "\"regression\"");
    }
}
