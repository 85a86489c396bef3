//! Pairwise feature interactions

use serde::{Deserialize, Serialize};

/// Offset added to the denominator of a division
pub const DIVIDE_EPSILON: f64 = 1e-5;

/// Type of interaction to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionType {
    /// Multiplication: a * b
    Multiply,
    /// Division: a / (b + 1e-5)
    Divide,
}

impl InteractionType {
    /// Interactions between two continuous columns
    pub const CONTINUOUS: [InteractionType; 2] = [InteractionType::Multiply, InteractionType::Divide];

    /// Apply interaction operation
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            InteractionType::Multiply => a * b,
            InteractionType::Divide => a / (b + DIVIDE_EPSILON),
        }
    }

    /// Operation word used in feature names
    pub fn name(&self) -> &'static str {
        match self {
            InteractionType::Multiply => "multiply",
            InteractionType::Divide => "divide",
        }
    }

    /// Feature name, e.g. `a multiply b`
    pub fn feature_name(&self, col_a: &str, col_b: &str) -> String {
        format!("{} {} {}", col_a, self.name(), col_b)
    }

    /// Educational explanation of the interaction
    pub fn describe(&self, col_a: &str, col_b: &str) -> String {
        match self {
            InteractionType::Multiply => format!(
                "Multiplication of {col_a} and {col_b}. Captures interaction effects and combined \
                 impact. \nCommon applications: creating area features (length × width), \
                 calculating population (area × density), computing total cost (price × \
                 quantity), and modeling combined effects."
            ),
            InteractionType::Divide => format!(
                "Division of {col_a} by {col_b}. Used to create per-unit measures by dividing one \
                 variable by another. \nCommon applications: calculating BMI (weight ÷ height²), \
                 price efficiency (price ÷ area), density metrics (population ÷ area), and \
                 normalized rates."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert_eq!(InteractionType::Multiply.apply(3.0, 4.0), 12.0);
        assert!((InteractionType::Divide.apply(1.0, 1.0) - 1.0 / 1.00001).abs() < 1e-12);
        // The epsilon only protects an exact zero
        assert!(InteractionType::Divide.apply(1.0, -DIVIDE_EPSILON).is_infinite());
    }

    #[test]
    fn test_names() {
        assert_eq!(InteractionType::Multiply.feature_name("a", "b"), "a multiply b");
        assert_eq!(InteractionType::Divide.feature_name("a", "b"), "a divide b");
        assert!(InteractionType::Divide.describe("a", "b").starts_with("Division of a by b."));
    }
}
