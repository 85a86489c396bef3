//! Model training module
//!
//! The numeric runtime behind every score in a search:
//! - Linear models (OLS, logistic regression)
//! - K-Fold and stratified K-Fold cross-validation

mod models;
pub mod cross_validation;
pub mod linear_models;

pub use models::{ModelKind, TaskModel};
pub use cross_validation::{cross_val_score, CrossValidator, CVStrategy, CVSplit, CVResults};
pub use linear_models::{accuracy_score, r2_score, LinearRegression, LogisticRegression};
