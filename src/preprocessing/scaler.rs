//! Feature scaling

use crate::error::{AutoFeError, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Per-column parameters of a fitted scaler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    center: f64,
    scale: f64,
}

/// Standard scaling (z-score normalization): (x - mean) / std
///
/// Uses the population standard deviation. Constant columns are centered
/// but left unscaled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    /// Create a new scaler
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the scaler to the columns of `x`
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(AutoFeError::ComputationError(
                "cannot fit scaler on zero rows".to_string(),
            ));
        }

        let n = x.nrows() as f64;
        self.params = x
            .axis_iter(Axis(1))
            .map(|col| {
                let mean = col.sum() / n;
                let var = col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
                let std = var.sqrt();
                ScalerParams {
                    center: mean,
                    scale: if std == 0.0 || !std.is_finite() { 1.0 } else { std },
                }
            })
            .collect();

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform `x` with the fitted parameters
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(AutoFeError::ModelNotFitted);
        }
        if x.ncols() != self.params.len() {
            return Err(AutoFeError::ShapeError {
                expected: format!("{} columns", self.params.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut scaled = x.to_owned();
        for (mut col, params) in scaled.axis_iter_mut(Axis(1)).zip(self.params.iter()) {
            col.mapv_inplace(|v| (v - params.center) / params.scale);
        }
        Ok(scaled)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standard_scaler() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0], [5.0, 50.0]];

        let mut scaler = StandardScaler::new();
        let result = scaler.fit_transform(&x).unwrap();

        for col in result.axis_iter(Axis(1)) {
            let mean = col.sum() / col.len() as f64;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / col.len() as f64;
            assert!(mean.abs() < 1e-10);
            assert!((var - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_constant_column_is_centered_only() {
        let x = array![[3.0], [3.0], [3.0]];
        let result = StandardScaler::new().fit_transform(&x).unwrap();
        assert!(result.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_transform_requires_fit() {
        let scaler = StandardScaler::new();
        assert!(matches!(
            scaler.transform(&array![[1.0]]),
            Err(AutoFeError::ModelNotFitted)
        ));
    }
}
