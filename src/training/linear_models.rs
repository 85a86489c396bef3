//! The two estimators used to score feature sets: least squares and logistic regression

use crate::error::{AutoFeError, Result};
use ndarray::{s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Relative ridge terms tried, smallest first, when the Gram matrix is singular
const RIDGE_STEPS: [f64; 3] = [1e-10, 1e-8, 1e-6];

/// Lower-triangular factor `L` with `L Lᵀ = a`; `None` unless `a` is positive definite
fn cholesky(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let residual = a[[i, j]] - l.slice(s![i, ..j]).dot(&l.slice(s![j, ..j]));
            if i == j {
                if !residual.is_finite() || residual <= 0.0 {
                    return None;
                }
                l[[i, i]] = residual.sqrt();
            } else {
                l[[i, j]] = residual / l[[j, j]];
            }
        }
    }

    Some(l)
}

/// Solve `L Lᵀ x = b` by forward then backward substitution
fn solve_factored(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = b.len();

    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let known = l.slice(s![i, ..i]).dot(&z.slice(s![..i]));
        z[i] = (b[i] - known) / l[[i, i]];
    }

    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let known = l.slice(s![i + 1.., i]).dot(&x.slice(s![i + 1..]));
        x[i] = (z[i] - known) / l[[i, i]];
    }

    x
}

/// Least squares through the normal equations `(XᵀX) w = Xᵀy`.
///
/// Collinear columns make `XᵀX` singular; those fits are retried with a
/// growing ridge on the diagonal, scaled to the mean diagonal entry.
fn solve_least_squares(x: &Array2<f64>, y: &Array1<f64>) -> Option<Array1<f64>> {
    let gram = x.t().dot(x);
    let rhs = x.t().dot(y);

    if let Some(l) = cholesky(&gram) {
        return Some(solve_factored(&l, &rhs));
    }

    let n = gram.nrows().max(1) as f64;
    let mean_diag = gram.diag().iter().map(|v| v.abs()).sum::<f64>() / n;
    let scale = if mean_diag > 0.0 { mean_diag } else { 1.0 };

    RIDGE_STEPS.iter().find_map(|step| {
        let mut regularized = gram.clone();
        regularized.diag_mut().mapv_inplace(|d| d + step * scale);
        cholesky(&regularized).map(|l| solve_factored(&l, &rhs))
    })
}

fn check_lengths(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(AutoFeError::ShapeError {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if x.nrows() == 0 {
        return Err(AutoFeError::ComputationError(
            "cannot fit on an empty training set".to_string(),
        ));
    }
    Ok(())
}

/// Ordinary least squares regression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    /// Center `x` and `y` before solving and recover the intercept afterwards
    pub fit_intercept: bool,
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            is_fitted: false,
        }
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Solve for the weights. Fails when the normal equations stay singular
    /// even after regularization.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_lengths(x, y)?;
        let singular = || {
            AutoFeError::ComputationError("normal equations are singular".to_string())
        };

        let (coefficients, intercept) = if self.fit_intercept {
            let x_mean = x.mean_axis(Axis(0)).ok_or_else(|| {
                AutoFeError::ComputationError("cannot center empty feature matrix".to_string())
            })?;
            let y_mean = y.mean().unwrap_or(0.0);

            let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
            let y_centered = y - y_mean;

            let coef = solve_least_squares(&x_centered, &y_centered).ok_or_else(singular)?;
            let intercept = y_mean - coef.dot(&x_mean);
            (coef, intercept)
        } else {
            let coef = solve_least_squares(x, y).ok_or_else(singular)?;
            (coef, 0.0)
        };

        if coefficients.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
            return Err(AutoFeError::ComputationError(
                "least squares produced non-finite coefficients".to_string(),
            ));
        }

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;

        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(AutoFeError::ModelNotFitted),
        };
        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }

    /// Coefficient of determination (R²) on the given data
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        Ok(r2_score(y, &y_pred))
    }
}

/// R² of predictions against truth. A constant truth yields 1.0 for a
/// perfect fit and 0.0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let y_mean = y_true.mean().unwrap_or(0.0);
    let ss_res = (y_pred - y_true).mapv(|v| v * v).sum();
    let ss_tot = y_true.mapv(|v| (v - y_mean) * (v - y_mean)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

/// Fraction of exactly matching labels
pub fn accuracy_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / y_true.len() as f64
}

/// Logistic regression for binary classification.
///
/// Any two numeric labels are accepted; the lower one is encoded as the
/// negative class. Weights start at zero, so fits are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    /// Labels seen during fit as (negative, positive)
    pub classes: Option<(f64, f64)>,
    /// Inverse L2 strength against the summed log loss. The penalty on the
    /// mean loss is `1 / (c * n)`, so it weakens as the training set grows.
    pub c: f64,
    pub max_iter: usize,
    /// Stop once the gradient norm drops below this
    pub tol: f64,
    pub learning_rate: f64,
    /// Kept with the configuration; zero-initialized descent does not draw from it
    pub random_state: Option<u64>,
    pub is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            classes: None,
            c: 1.0,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
            random_state: None,
            is_fitted: false,
        }
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Lower and upper label of a binary target
    fn binary_classes(y: &Array1<f64>) -> Result<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in y.iter() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if y.iter().any(|&v| v != lo && v != hi) {
            return Err(AutoFeError::InvalidParameter {
                name: "y".to_string(),
                value: "more than two labels".to_string(),
                reason: "logistic regression is binary".to_string(),
            });
        }
        Ok((lo, hi))
    }

    /// Full-batch gradient descent on the penalized log loss
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_lengths(x, y)?;
        if self.c.is_nan() || self.c <= 0.0 {
            return Err(AutoFeError::InvalidParameter {
                name: "c".to_string(),
                value: self.c.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let (neg, pos) = Self::binary_classes(y)?;
        let target = y.mapv(|v| f64::from(u8::from(v == pos && pos != neg)));
        let inv_n = 1.0 / x.nrows() as f64;
        let alpha = inv_n / self.c;

        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;

        for _ in 0..self.max_iter {
            let residual = Self::sigmoid(&(x.dot(&weights) + bias)) - &target;
            let grad_w = x.t().dot(&residual) * inv_n + &weights * alpha;
            let grad_b = residual.sum() * inv_n;

            if grad_w.dot(&grad_w) + grad_b * grad_b < self.tol * self.tol {
                break;
            }

            weights.scaled_add(-self.learning_rate, &grad_w);
            bias -= self.learning_rate * grad_b;
        }

        if weights.iter().any(|w: &f64| !w.is_finite()) || !bias.is_finite() {
            return Err(AutoFeError::ComputationError(
                "gradient descent diverged".to_string(),
            ));
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        self.classes = Some((neg, pos));
        self.is_fitted = true;

        Ok(self)
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(AutoFeError::ModelNotFitted),
        };
        let linear = x.dot(coefficients) + self.intercept.unwrap_or(0.0);
        Ok(Self::sigmoid(&linear))
    }

    /// Predict class labels in the original label space
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (neg, pos) = self.classes.ok_or(AutoFeError::ModelNotFitted)?;
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { pos } else { neg }))
    }

    /// Accuracy on the given data
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        Ok(accuracy_score(y, &y_pred))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_regression_simple() {
        // y = 2*x1 + 3*x2 + 1
        let x = array![[1.0, 1.0], [2.0, 1.0], [3.0, 2.0], [4.0, 3.0], [5.0, 5.0]];
        let y = array![6.0, 8.0, 13.0, 18.0, 26.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-6);
        assert!((coef[1] - 3.0).abs() < 1e-6);
        assert!((model.intercept.unwrap() - 1.0).abs() < 1e-6);
        assert!((model.score(&x, &y).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_regression_length_mismatch() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0];
        let mut model = LinearRegression::new();
        assert!(matches!(model.fit(&x, &y), Err(AutoFeError::ShapeError { .. })));
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LinearRegression::new();
        let x = array![[1.0]];
        assert!(matches!(model.predict(&x), Err(AutoFeError::ModelNotFitted)));
    }

    #[test]
    fn test_logistic_regression() {
        let x = array![[-2.0], [-1.5], [-1.0], [-0.5], [0.5], [1.0], [1.5], [2.0]];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];

        let mut model = LogisticRegression::new().with_random_state(42);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
        let proba = model.predict_proba(&x).unwrap();
        assert!(proba[0] < 0.5);
        assert!(proba[7] > 0.5);
    }

    #[test]
    fn test_logistic_regression_arbitrary_labels() {
        let x = array![[-2.0], [-1.0], [-0.5], [0.5], [1.0], [2.0]];
        let y = array![3.0, 3.0, 3.0, 7.0, 7.0, 7.0];

        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&x).unwrap();
        assert_eq!(pred, y);
    }

    #[test]
    fn test_logistic_rejects_multiclass() {
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![0.0, 1.0, 2.0];
        let mut model = LogisticRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_collinear_columns_still_fit() {
        // Second column duplicates the first
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        assert!((model.score(&x, &y).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_without_intercept() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];

        let mut model = LinearRegression::new().with_fit_intercept(false);
        model.fit(&x, &y).unwrap();
        assert_eq!(model.intercept, Some(0.0));
        assert!((model.coefficients.as_ref().unwrap()[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_logistic_builders() {
        let x = array![[-1.0], [-0.5], [0.5], [1.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];

        let mut model = LogisticRegression::new()
            .with_c(f64::INFINITY)
            .with_learning_rate(0.5)
            .with_max_iter(200);
        model.fit(&x, &y).unwrap();
        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_penalty_weakens_with_more_rows() {
        let x = array![[-2.0], [-1.0], [-0.5], [0.5], [1.0], [2.0]];
        let y = array![0.0, 0.0, 1.0, 0.0, 1.0, 1.0];
        let x_twice = ndarray::concatenate(Axis(0), &[x.view(), x.view()]).unwrap();
        let y_twice = ndarray::concatenate(Axis(0), &[y.view(), y.view()]).unwrap();

        let fit = |x: &Array2<f64>, y: &Array1<f64>| {
            let mut model = LogisticRegression::new().with_learning_rate(0.5).with_max_iter(20_000);
            model.fit(x, y).unwrap();
            model.coefficients.unwrap()[0]
        };

        // Same mean loss, half the penalty
        let w = fit(&x, &y);
        let w_twice = fit(&x_twice, &y_twice);
        assert!(w > 0.0);
        assert!(w_twice > w + 1e-3);
    }

    #[test]
    fn test_logistic_rejects_non_positive_c() {
        let x = array![[0.0], [1.0]];
        let y = array![0.0, 1.0];
        let mut model = LogisticRegression::new().with_c(0.0);
        assert!(matches!(
            model.fit(&x, &y),
            Err(AutoFeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_r2_constant_truth() {
        let y = array![2.0, 2.0, 2.0];
        assert_eq!(r2_score(&y, &y), 1.0);
        assert_eq!(r2_score(&y, &array![1.0, 2.0, 3.0]), 0.0);
    }
}
