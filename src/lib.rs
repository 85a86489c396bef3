//! EduAutoFE - educational automated feature engineering
//!
//! Searches for single transformed features (log, sqrt, powers, products,
//! ratios) that improve a linear model's cross-validated score, and explains
//! each improvement in plain language.
//!
//! # Modules
//!
//! ## Search pipeline
//! - [`validation`] - Input checks with remediation hints
//! - [`task`] - Classification/regression detection and model selection
//! - [`feature_engineering`] - Candidate transforms and interactions
//! - [`evaluation`] - Cross-validated scoring of feature sets
//! - [`search`] - Orchestration, budgets and ranked results
//! - [`report`] - Human-readable results
//!
//! ## Numeric runtime
//! - [`preprocessing`] - Standard scaling
//! - [`training`] - Linear models and cross-validation
//!
//! ## Interfaces
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Search pipeline
pub mod validation;
pub mod task;
pub mod feature_engineering;
pub mod evaluation;
pub mod search;
pub mod report;

// Numeric runtime
pub mod preprocessing;
pub mod training;
pub mod utils;

// Interfaces
pub mod cli;

pub use error::{AutoFeError, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{AutoFeError, Result, ValidationError, ValidationKind};

    pub use crate::search::{FeatureSearch, ResultRecord, ResultTable, SearchConfig, SearchReport};

    pub use crate::task::{detect_task_type, get_model_and_scoring, TaskType};

    pub use crate::feature_engineering::{generate_candidates, Candidate, SearchSpace};

    pub use crate::evaluation::{evaluate_baseline, evaluate_feature, FeatureEvaluator};

    pub use crate::validation::{validate, Dataset, Target};

    pub use crate::report::{ConsoleReporter, Reporter, SilentReporter};
}
