//! Single-column transforms

use serde::{Deserialize, Serialize};

/// Transform applied to one column at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryTransform {
    /// Log with offset: ln(x + 1)
    Log,
    /// Square root of the magnitude: sqrt(|x|)
    Sqrt,
    /// x²
    Square,
    /// x³
    Cube,
}

impl UnaryTransform {
    /// Every transform, in enumeration order
    pub const ALL: [UnaryTransform; 4] = [
        UnaryTransform::Log,
        UnaryTransform::Sqrt,
        UnaryTransform::Square,
        UnaryTransform::Cube,
    ];

    pub fn apply(&self, x: f64) -> f64 {
        match self {
            UnaryTransform::Log => (x + 1.0).ln(),
            UnaryTransform::Sqrt => x.abs().sqrt(),
            UnaryTransform::Square => x * x,
            UnaryTransform::Cube => x * x * x,
        }
    }

    /// Short name used in feature names, e.g. `sqrt` in `sqrt(col)`
    pub fn name(&self) -> &'static str {
        match self {
            UnaryTransform::Log => "log",
            UnaryTransform::Sqrt => "sqrt",
            UnaryTransform::Square => "square",
            UnaryTransform::Cube => "cube",
        }
    }

    pub fn feature_name(&self, col: &str) -> String {
        format!("{}({})", self.name(), col)
    }

    /// Educational explanation of the transform applied to `col`
    pub fn describe(&self, col: &str) -> String {
        match self {
            UnaryTransform::Log => format!(
                "Log transformation of {col}. Compresses the long tail in the high part of \
                 heavy-tailed distributions and expands the low part, making data more normally \
                 distributed. \nCommon applications: data that spreads over several orders of \
                 magnitude, such as prices, populations, incomes, number of reviews, word \
                 frequencies, and sales figures."
            ),
            UnaryTransform::Sqrt => format!(
                "Square root of {col}. Used for Poisson-distributed data where variance equals \
                 the mean. Stabilizes variance so it is no longer dependent on the mean. Also \
                 used for compressing the long tail and strengthening the signal. \nCommon \
                 applications: count data, event frequencies, patient measurements with extreme \
                 values (like weight or blood pressure), and visit counts."
            ),
            UnaryTransform::Square => format!(
                "Square of {col}. Polynomial transformation used to capture non-linear patterns \
                 in data, which is especially valuable for linear models that have difficulty \
                 finding these relationships on their own. Adds higher-order components to \
                 create new, more complex features. \nCommon applications: variables with \
                 quadratic relationships, such as age effects, distance calculations, and \
                 diminishing returns patterns."
            ),
            UnaryTransform::Cube => format!(
                "Cube of {col}. Polynomial transformation used to capture non-linear patterns in \
                 data, which is especially valuable for linear models that have difficulty \
                 finding these relationships on their own. Adds higher-order components to \
                 create new, more complex features. \nCommon applications: variables with strong \
                 non-linear relationships, such as accelerating growth patterns, S-shaped \
                 curves, and compound effects."
            ),
        }
    }
}
