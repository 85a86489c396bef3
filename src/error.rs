//! Error types for eduautofe

use thiserror::Error;

/// Result type alias for eduautofe operations
pub type Result<T> = std::result::Result<T, AutoFeError>;

/// Main error type
#[derive(Error, Debug)]
pub enum AutoFeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Model not fitted")]
    ModelNotFitted,
}

/// Kind of input problem found by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    BadType,
    TooManyColumns,
    IdLikeColumn,
    NonNumericColumn,
    MissingValuesInX,
    MissingValuesInY,
    ConstantTarget,
}

/// Input problems, each carrying a remediation hint.
///
/// Displayed as `Error: <problem>` followed by a blank line and the hint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Error: {what} must be {expected}\n\n{hint}")]
    BadType {
        what: &'static str,
        expected: &'static str,
        hint: String,
    },

    #[error("Error: Too many columns ({count})\n\n{hint}")]
    TooManyColumns { count: usize, hint: String },

    #[error("Error: '{column}' looks like an ID column\n\n{hint}")]
    IdLikeColumn { column: String, hint: String },

    #[error("Error: Found text columns: {columns:?}\n\n{hint}")]
    NonNumericColumns { columns: Vec<String>, hint: String },

    #[error("Error: Missing values in: {columns:?}\n\n{hint}")]
    MissingValuesInX { columns: Vec<String>, hint: String },

    #[error("Error: {count} missing values in y\n\n{hint}")]
    MissingValuesInY { count: usize, hint: String },

    #[error("Error: y has a single distinct value ({value})\n\n{hint}")]
    ConstantTarget { value: f64, hint: String },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::BadType { .. } => ValidationKind::BadType,
            ValidationError::TooManyColumns { .. } => ValidationKind::TooManyColumns,
            ValidationError::IdLikeColumn { .. } => ValidationKind::IdLikeColumn,
            ValidationError::NonNumericColumns { .. } => ValidationKind::NonNumericColumn,
            ValidationError::MissingValuesInX { .. } => ValidationKind::MissingValuesInX,
            ValidationError::MissingValuesInY { .. } => ValidationKind::MissingValuesInY,
            ValidationError::ConstantTarget { .. } => ValidationKind::ConstantTarget,
        }
    }

    /// Remediation text shown to the user
    pub fn hint(&self) -> &str {
        match self {
            ValidationError::BadType { hint, .. }
            | ValidationError::TooManyColumns { hint, .. }
            | ValidationError::IdLikeColumn { hint, .. }
            | ValidationError::NonNumericColumns { hint, .. }
            | ValidationError::MissingValuesInX { hint, .. }
            | ValidationError::MissingValuesInY { hint, .. }
            | ValidationError::ConstantTarget { hint, .. } => hint,
        }
    }
}

impl AutoFeError {
    /// Validation kind, if this is an input error
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            AutoFeError::Validation(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<polars::error::PolarsError> for AutoFeError {
    fn from(err: polars::error::PolarsError) -> Self {
        AutoFeError::DataError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for AutoFeError {
    fn from(err: ndarray::ShapeError) -> Self {
        AutoFeError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AutoFeError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AutoFeError = io_err.into();
        assert!(matches!(err, AutoFeError::IoError(_)));
    }

    #[test]
    fn test_validation_error_carries_hint() {
        let err = ValidationError::IdLikeColumn {
            column: "id".to_string(),
            hint: "Drop it".to_string(),
        };
        assert_eq!(err.kind(), ValidationKind::IdLikeColumn);
        assert_eq!(err.hint(), "Drop it");
        assert_eq!(err.to_string(), "Error: 'id' looks like an ID column\n\nDrop it");

        let wrapped: AutoFeError = err.into();
        assert_eq!(wrapped.validation_kind(), Some(ValidationKind::IdLikeColumn));
        assert!(wrapped.to_string().starts_with("Error: 'id'"));
    }
}
