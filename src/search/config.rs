//! Search configuration

use crate::error::{AutoFeError, Result};
use crate::evaluation::DEFAULT_CV_FOLDS;
use serde::{Deserialize, Serialize};

/// Run parameters of a feature search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of improving features to keep
    pub max_results: usize,

    /// Wall-clock budget in minutes; `None` searches exhaustively
    pub max_minutes: Option<f64>,

    /// Seed for the candidate shuffle
    pub random_state: Option<u64>,

    /// Number of cross-validation folds
    pub cv_folds: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            max_minutes: None,
            random_state: None,
            cv_folds: DEFAULT_CV_FOLDS,
        }
    }
}

impl SearchConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Builder method to limit the search to `minutes` of wall-clock time
    pub fn with_max_minutes(mut self, minutes: f64) -> Self {
        self.max_minutes = Some(minutes);
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn with_cv_folds(mut self, cv_folds: usize) -> Self {
        self.cv_folds = cv_folds;
        self
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(AutoFeError::InvalidParameter {
                name: "max_results".to_string(),
                value: self.max_results.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if let Some(minutes) = self.max_minutes {
            if !minutes.is_finite() || minutes <= 0.0 {
                return Err(AutoFeError::InvalidParameter {
                    name: "max_minutes".to_string(),
                    value: minutes.to_string(),
                    reason: "must be a positive number of minutes".to_string(),
                });
            }
        }
        if self.cv_folds < 2 {
            return Err(AutoFeError::InvalidParameter {
                name: "cv_folds".to_string(),
                value: self.cv_folds.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        Ok(())
    }
}
