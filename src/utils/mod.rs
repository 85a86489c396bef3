//! Utility functions

use std::collections::HashSet;

/// Number of distinct values, treating `0.0` and `-0.0` as equal and all
/// NaNs as one value.
pub fn n_distinct<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'a f64>,
{
    values
        .into_iter()
        .map(|&v| {
            if v == 0.0 {
                0.0f64.to_bits()
            } else if v.is_nan() {
                f64::NAN.to_bits()
            } else {
                v.to_bits()
            }
        })
        .collect::<HashSet<u64>>()
        .len()
}

/// True if every value is finite
pub fn all_finite<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = &'a f64>,
{
    values.into_iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_distinct() {
        assert_eq!(n_distinct(&[1.0, 2.0, 2.0, 3.0]), 3);
        assert_eq!(n_distinct(&[0.0, -0.0]), 1);
        assert_eq!(n_distinct(&Vec::<f64>::new()), 0);
    }

    #[test]
    fn test_all_finite() {
        assert!(all_finite(&[1.0, -2.0]));
        assert!(!all_finite(&[1.0, f64::NAN]));
        assert!(!all_finite(&[f64::INFINITY]));
    }
}
