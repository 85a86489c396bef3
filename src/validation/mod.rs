//! Input validation
//!
//! Turns caller-supplied tables into the validated [`Dataset`] and [`Target`]
//! value types. Every check fails fast with a [`ValidationError`] that carries
//! a remediation hint.

use crate::error::{AutoFeError, Result, ValidationError};
use crate::utils::n_distinct;
use ndarray::{Array1, Array2, ArrayView1};
use polars::prelude::*;

/// Maximum number of feature columns accepted
pub const MAX_COLUMNS: usize = 100;

/// Name fragments that mark a column as a possible identifier
pub const ID_PATTERNS: [&str; 5] = ["id", "index", "key", "number", "code"];

/// Distinct-value ratio above which an identifier-named column is rejected
pub const ID_UNIQUENESS_THRESHOLD: f64 = 0.95;

/// Feature matrix as handed in by the caller
#[derive(Debug, Clone, Copy)]
pub enum FeatureInput<'a> {
    /// A labeled table
    Table(&'a DataFrame),
    /// A bare matrix without column names
    Matrix(&'a Array2<f64>),
}

impl<'a> From<&'a DataFrame> for FeatureInput<'a> {
    fn from(df: &'a DataFrame) -> Self {
        FeatureInput::Table(df)
    }
}

impl<'a> From<&'a Array2<f64>> for FeatureInput<'a> {
    fn from(x: &'a Array2<f64>) -> Self {
        FeatureInput::Matrix(x)
    }
}

/// Target as handed in by the caller
#[derive(Debug, Clone, Copy)]
pub enum TargetInput<'a> {
    /// A single named series
    Series(&'a Series),
    /// A table in place of a series
    Table(&'a DataFrame),
    /// A bare vector without a name
    Array(&'a Array1<f64>),
}

impl<'a> From<&'a Series> for TargetInput<'a> {
    fn from(s: &'a Series) -> Self {
        TargetInput::Series(s)
    }
}

impl<'a> From<&'a DataFrame> for TargetInput<'a> {
    fn from(df: &'a DataFrame) -> Self {
        TargetInput::Table(df)
    }
}

impl<'a> From<&'a Array1<f64>> for TargetInput<'a> {
    fn from(y: &'a Array1<f64>) -> Self {
        TargetInput::Array(y)
    }
}

/// Validated feature matrix: named numeric columns, no missing values,
/// at most [`MAX_COLUMNS`] columns.
#[derive(Debug, Clone)]
pub struct Dataset {
    feature_names: Vec<String>,
    features: Array2<f64>,
}

impl Dataset {
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.features.ncols()
    }

    /// Values of column `idx`
    pub fn column(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.features.column(idx)
    }
}

/// Validated numeric target without missing values
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    values: Array1<f64>,
}

impl Target {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Column values as f64, nulls as NaN
fn series_to_f64(series: &Series) -> Result<Vec<f64>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn missing_count(series: &Series) -> Result<usize> {
    if !is_numeric(series.dtype()) {
        return Ok(series.null_count());
    }
    Ok(series_to_f64(series)?.iter().filter(|v| v.is_nan()).count())
}

fn matrix_type_error() -> AutoFeError {
    ValidationError::BadType {
        what: "X",
        expected: "a polars DataFrame with named columns",
        hint: "Fix: x = DataFrame::new(vec![Series::new(\"col\".into(), values).into()])?"
            .to_string(),
    }
    .into()
}

fn target_type_error() -> AutoFeError {
    ValidationError::BadType {
        what: "y",
        expected: "a polars Series",
        hint: "Fix: y = Series::new(\"target\".into(), values)\n\
               or y = df.column(\"target\")?.as_materialized_series().clone()"
            .to_string(),
    }
    .into()
}

/// Validate a feature table and convert it to a [`Dataset`]
pub fn validate_features<'a>(x: impl Into<FeatureInput<'a>>) -> Result<Dataset> {
    let df = match x.into() {
        FeatureInput::Table(df) => df,
        FeatureInput::Matrix(_) => return Err(matrix_type_error()),
    };

    let columns = df.get_columns();

    if columns.len() > MAX_COLUMNS {
        return Err(ValidationError::TooManyColumns {
            count: columns.len(),
            hint: "This happens when your dataset has too many features\n\
                   or one-hot encoding created too many columns.\n\n\
                   Drop with: x.drop_many([\"col1\", \"col2\", ...])"
                .to_string(),
        }
        .into());
    }

    let n_rows = df.height();
    for column in columns {
        let name = column.name().as_str();
        let lower = name.to_lowercase();
        if !ID_PATTERNS.iter().any(|p| lower.contains(p)) {
            continue;
        }
        if !matches!(column.dtype(), DataType::Int64 | DataType::Float64) || n_rows == 0 {
            continue;
        }
        let values = series_to_f64(column.as_materialized_series())?;
        let present: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        let uniqueness = n_distinct(&present) as f64 / n_rows as f64;
        if uniqueness > ID_UNIQUENESS_THRESHOLD {
            return Err(ValidationError::IdLikeColumn {
                column: name.to_string(),
                hint: format!("Drop with: x.drop(\"{}\")", name),
            }
            .into());
        }
    }

    let text_columns: Vec<String> = columns
        .iter()
        .filter(|c| !is_numeric(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();
    if !text_columns.is_empty() {
        return Err(ValidationError::NonNumericColumns {
            columns: text_columns,
            hint: "One-hot encode with: x.columns_to_dummies(vec![\"text_col\"], None, true)\n\
                   Drop with: x.drop(\"text_col\")\n\
                   Label encode with: cast the column to Categorical, then to its physical UInt32 codes"
                .to_string(),
        }
        .into());
    }

    let mut with_missing = Vec::new();
    for column in columns {
        if missing_count(column.as_materialized_series())? > 0 {
            with_missing.push(column.name().to_string());
        }
    }
    if !with_missing.is_empty() {
        return Err(ValidationError::MissingValuesInX {
            columns: with_missing,
            hint: "Fill with median: x.fill_null(FillNullStrategy::Median) per column\n\
                   Fill with mean: x.fill_null(FillNullStrategy::Mean)\n\
                   Drop with: x.drop(\"col_with_missing\")"
                .to_string(),
        }
        .into());
    }

    let feature_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let col_data: Vec<Vec<f64>> = columns
        .iter()
        .map(|c| series_to_f64(c.as_materialized_series()))
        .collect::<Result<_>>()?;
    let features = Array2::from_shape_fn((n_rows, col_data.len()), |(r, c)| col_data[c][r]);

    Ok(Dataset {
        feature_names,
        features,
    })
}

/// Validate a target and convert it to a [`Target`]
pub fn validate_target<'a>(y: impl Into<TargetInput<'a>>) -> Result<Target> {
    let series = match y.into() {
        TargetInput::Series(s) => s,
        TargetInput::Table(_) | TargetInput::Array(_) => return Err(target_type_error()),
    };

    if !is_numeric(series.dtype()) {
        return Err(ValidationError::BadType {
            what: "y",
            expected: "a numeric Series",
            hint: "Fix: encode the target as numbers, e.g. 0/1 for two classes".to_string(),
        }
        .into());
    }

    let missing = missing_count(series)?;
    if missing > 0 {
        return Err(ValidationError::MissingValuesInY {
            count: missing,
            hint: "Fill with: y.fill_null(FillNullStrategy::Median)".to_string(),
        }
        .into());
    }

    Ok(Target {
        name: series.name().to_string(),
        values: Array1::from(series_to_f64(series)?),
    })
}

/// Validate features and target together.
///
/// Checks run in a fixed order and the first failure is returned.
pub fn validate<'a, 'b>(
    x: impl Into<FeatureInput<'a>>,
    y: impl Into<TargetInput<'b>>,
) -> Result<(Dataset, Target)> {
    // Container types are checked before any content
    let df = match x.into() {
        FeatureInput::Table(df) => df,
        FeatureInput::Matrix(_) => return Err(matrix_type_error()),
    };
    let series = match y.into() {
        TargetInput::Series(s) => s,
        TargetInput::Table(_) | TargetInput::Array(_) => return Err(target_type_error()),
    };

    let dataset = validate_features(df)?;
    let target = validate_target(series)?;

    if dataset.n_rows() != target.len() {
        return Err(AutoFeError::ShapeError {
            expected: format!("y length = {}", dataset.n_rows()),
            actual: format!("y length = {}", target.len()),
        });
    }

    if n_distinct(target.values()) <= 1 {
        return Err(ValidationError::ConstantTarget {
            value: target.values().first().copied().unwrap_or(f64::NAN),
            hint: "A target with one value leaves nothing to predict.\n\
                   Check that the right column was selected as y."
                .to_string(),
        }
        .into());
    }

    Ok((dataset, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationKind;

    fn frame() -> DataFrame {
        df!(
            "a" => &[1.0, 2.0, 3.0, 4.0],
            "b" => &[1i64, 0, 1, 0]
        )
        .unwrap()
    }

    fn target() -> Series {
        Series::new("y".into(), &[1.0, 2.0, 3.0, 5.0])
    }

    #[test]
    fn test_valid_input() {
        let (dataset, target) = validate(&frame(), &target()).unwrap();
        assert_eq!(dataset.n_rows(), 4);
        assert_eq!(dataset.n_columns(), 2);
        assert_eq!(dataset.feature_names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(dataset.column(1).to_vec(), vec![1.0, 0.0, 1.0, 0.0]);
        assert_eq!(target.name(), "y");
        assert_eq!(target.len(), 4);
    }

    #[test]
    fn test_matrix_rejected() {
        let x = Array2::<f64>::zeros((4, 2));
        let err = validate(&x, &target()).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::BadType));
    }

    #[test]
    fn test_target_array_rejected() {
        let y = Array1::from(vec![1.0, 2.0, 3.0, 4.0]);
        let err = validate(&frame(), &y).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::BadType));
    }

    #[test]
    fn test_nan_in_target() {
        let y = Series::new("y".into(), &[1.0, f64::NAN, 3.0, 4.0]);
        let err = validate(&frame(), &y).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::MissingValuesInY));
    }

    #[test]
    fn test_constant_target() {
        let y = Series::new("y".into(), &[1.0, 1.0, 1.0, 1.0]);
        let err = validate(&frame(), &y).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::ConstantTarget));
    }

    #[test]
    fn test_row_mismatch() {
        let y = Series::new("y".into(), &[1.0, 2.0, 3.0]);
        assert!(matches!(
            validate(&frame(), &y),
            Err(AutoFeError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_id_column_needs_high_uniqueness() {
        let df = df!(
            "user_id" => &[1i64, 1, 2, 2],
            "a" => &[1.0, 2.0, 3.0, 4.0]
        )
        .unwrap();
        assert!(validate_features(&df).is_ok());
    }

    #[test]
    fn test_boolean_column_is_non_numeric() {
        let df = df!("flag" => &[true, false, true, false]).unwrap();
        let err = validate_features(&df).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::NonNumericColumn));
    }
}
