//! Sample datasets for the demo command

use crate::error::Result;
use polars::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Patient-style regression data; the target grows with the square root of
/// `visits` and with `bmi` only for smokers.
pub fn regression_dataset(n: usize, seed: Option<u64>) -> Result<DataFrame> {
    let mut rng = rng(seed);

    let age: Vec<f64> = (0..n).map(|_| rng.gen_range(19.0..79.0)).collect();
    let bmi: Vec<f64> = (0..n).map(|_| rng.gen_range(18.0..42.0)).collect();
    let bp: Vec<f64> = (0..n).map(|_| rng.gen_range(60.0..130.0)).collect();
    let visits: Vec<f64> = (0..n).map(|_| rng.gen_range(0u32..400) as f64).collect();
    let smoker: Vec<f64> = (0..n).map(|_| if rng.gen_bool(0.3) { 1.0 } else { 0.0 }).collect();

    let target: Vec<f64> = (0..n)
        .map(|i| {
            let base = age[i] * 0.4 + bp[i] * 0.2 + visits[i].sqrt() * 6.0 + bmi[i] * smoker[i] * 1.5;
            base + rng.gen_range(-5.0..5.0)
        })
        .collect();

    Ok(DataFrame::new(vec![
        Series::new("age".into(), age).into(),
        Series::new("bmi".into(), bmi).into(),
        Series::new("bp".into(), bp).into(),
        Series::new("visits".into(), visits).into(),
        Series::new("smoker".into(), smoker).into(),
        Series::new("target".into(), target).into(),
    ])?)
}

/// Customer-style binary data; the label follows the log of a heavy-tailed
/// `income` column. Classes are balanced around the median score.
pub fn classification_dataset(n: usize, seed: Option<u64>) -> Result<DataFrame> {
    let mut rng = rng(seed);

    let income: Vec<f64> = (0..n).map(|_| rng.gen_range(7.0f64..13.0).exp()).collect();
    let age: Vec<f64> = (0..n).map(|_| rng.gen_range(18.0..75.0)).collect();
    let tenure: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..20.0)).collect();

    let score: Vec<f64> = (0..n)
        .map(|i| income[i].ln() * 1.2 - age[i] * 0.02 + tenure[i] * 0.05 + rng.gen_range(-0.5..0.5))
        .collect();
    let mut sorted = score.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = sorted.get(n / 2).copied().unwrap_or(0.0);
    let target: Vec<i64> = score.iter().map(|&s| i64::from(s >= median)).collect();

    Ok(DataFrame::new(vec![
        Series::new("income".into(), income).into(),
        Series::new("age".into(), age).into(),
        Series::new("tenure".into(), tenure).into(),
        Series::new("target".into(), target).into(),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_dataset_shape() {
        let df = regression_dataset(50, Some(1)).unwrap();
        assert_eq!(df.shape(), (50, 6));
    }

    #[test]
    fn test_classification_dataset_is_binary() {
        let df = classification_dataset(40, Some(2)).unwrap();
        assert_eq!(df.shape(), (40, 4));
        assert_eq!(df.column("target").unwrap().n_unique().unwrap(), 2);
    }

    #[test]
    fn test_seeded_datasets_repeat() {
        let a = regression_dataset(20, Some(3)).unwrap();
        let b = regression_dataset(20, Some(3)).unwrap();
        assert!(a.equals(&b));
    }
}
