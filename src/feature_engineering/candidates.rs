//! Candidate enumeration over a validated dataset

use super::interactions::InteractionType;
use super::transforms::UnaryTransform;
use crate::utils::{all_finite, n_distinct};
use crate::validation::Dataset;
use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One generated feature under consideration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// e.g. `sqrt(col_A)` or `a multiply b`
    pub name: String,
    /// Values aligned to the dataset rows
    pub values: Array1<f64>,
    /// Educational explanation shown in the report
    pub description: String,
}

/// How a column takes part in pairwise interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Exactly two distinct values
    Binary,
    Continuous,
}

impl ColumnKind {
    pub fn of(values: ArrayView1<'_, f64>) -> Self {
        if n_distinct(values.iter()) == 2 {
            ColumnKind::Binary
        } else {
            ColumnKind::Continuous
        }
    }
}

/// Size of the candidate space before invalid candidates are filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub n_columns: usize,
    pub n_continuous: usize,
    pub n_binary: usize,
}

impl SearchSpace {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let n_continuous = (0..dataset.n_columns())
            .filter(|&j| ColumnKind::of(dataset.column(j)) == ColumnKind::Continuous)
            .count();
        Self {
            n_columns: dataset.n_columns(),
            n_continuous,
            n_binary: dataset.n_columns() - n_continuous,
        }
    }

    pub fn n_unary(&self) -> usize {
        self.n_columns * UnaryTransform::ALL.len()
    }

    pub fn n_continuous_pairs(&self) -> usize {
        let pairs = self.n_continuous * self.n_continuous.saturating_sub(1) / 2;
        pairs * InteractionType::CONTINUOUS.len()
    }

    pub fn n_mixed_pairs(&self) -> usize {
        self.n_continuous * self.n_binary
    }

    /// Total number of candidates enumerated
    pub fn total(&self) -> usize {
        self.n_unary() + self.n_continuous_pairs() + self.n_mixed_pairs()
    }
}

/// Generator output
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    /// Valid candidates in enumeration order
    pub candidates: Vec<Candidate>,
    /// Number of continuous columns in the dataset
    pub n_continuous: usize,
    /// Number of candidates dropped for non-finite values
    pub n_dropped: usize,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

struct Collector {
    set: CandidateSet,
}

impl Collector {
    fn push(&mut self, name: String, values: Array1<f64>, description: String) {
        if all_finite(values.iter()) {
            self.set.candidates.push(Candidate {
                name,
                values,
                description,
            });
        } else {
            debug!(candidate = %name, "Dropped candidate with non-finite values");
            self.set.n_dropped += 1;
        }
    }
}

/// Enumerate every candidate for `dataset`.
///
/// Order: all single-column transforms column by column, then
/// continuous × continuous pairs (`i < j`, multiply then divide), then
/// continuous × binary products. Candidates containing NaN or infinity are
/// dropped.
pub fn generate_candidates(dataset: &Dataset) -> CandidateSet {
    let names = dataset.feature_names();

    let mut continuous = Vec::new();
    let mut binary = Vec::new();
    for j in 0..dataset.n_columns() {
        match ColumnKind::of(dataset.column(j)) {
            ColumnKind::Continuous => continuous.push(j),
            ColumnKind::Binary => binary.push(j),
        }
    }

    let mut out = Collector {
        set: CandidateSet {
            candidates: Vec::new(),
            n_continuous: continuous.len(),
            n_dropped: 0,
        },
    };

    for (j, col) in names.iter().enumerate() {
        let column = dataset.column(j);
        for transform in UnaryTransform::ALL {
            out.push(
                transform.feature_name(col),
                column.mapv(|x| transform.apply(x)),
                transform.describe(col),
            );
        }
    }

    for (pos, &a) in continuous.iter().enumerate() {
        for &b in &continuous[pos + 1..] {
            for op in InteractionType::CONTINUOUS {
                out.push(
                    op.feature_name(&names[a], &names[b]),
                    combine(dataset.column(a), dataset.column(b), op),
                    op.describe(&names[a], &names[b]),
                );
            }
        }
    }

    let op = InteractionType::Multiply;
    for &a in &continuous {
        for &b in &binary {
            out.push(
                op.feature_name(&names[a], &names[b]),
                combine(dataset.column(a), dataset.column(b), op),
                op.describe(&names[a], &names[b]),
            );
        }
    }

    debug!(
        generated = out.set.len(),
        dropped = out.set.n_dropped,
        "Candidate generation finished"
    );
    out.set
}

fn combine(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, op: InteractionType) -> Array1<f64> {
    Zip::from(&a).and(&b).map_collect(|&x, &y| op.apply(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_features;
    use polars::prelude::*;

    fn dataset(df: &DataFrame) -> Dataset {
        validate_features(df).unwrap()
    }

    #[test]
    fn test_search_space_count() {
        let df = df![
            "a" => [1.0, 2.0, 3.0, 4.0],
            "b" => [2.0, 3.0, 5.0, 7.0],
            "c" => [0.5, 1.5, 2.5, 3.5],
            "flag" => [0i64, 1, 0, 1],
        ]
        .unwrap();
        let ds = dataset(&df);
        let space = SearchSpace::from_dataset(&ds);

        assert_eq!(space.n_continuous, 3);
        assert_eq!(space.n_binary, 1);
        // 4 * 4 + C(3, 2) * 2 + 3 * 1
        assert_eq!(space.total(), 16 + 6 + 3);

        let set = generate_candidates(&ds);
        assert_eq!(set.len() + set.n_dropped, space.total());
        assert_eq!(set.n_continuous, 3);
    }

    #[test]
    fn test_enumeration_order() {
        let df = df![
            "a" => [1.0, 2.0, 3.0],
            "b" => [4.0, 5.0, 6.0],
            "flag" => [1.0, 0.0, 1.0],
        ]
        .unwrap();
        let set = generate_candidates(&dataset(&df));
        let names: Vec<&str> = set.candidates.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "log(a)",
                "sqrt(a)",
                "square(a)",
                "cube(a)",
                "log(b)",
                "sqrt(b)",
                "square(b)",
                "cube(b)",
                "log(flag)",
                "sqrt(flag)",
                "square(flag)",
                "cube(flag)",
                "a multiply b",
                "a divide b",
                "a multiply flag",
                "b multiply flag",
            ]
        );
    }

    #[test]
    fn test_non_finite_candidates_are_dropped() {
        // log(x + 1) is -inf at -1 and NaN below it
        let df = df![
            "neg" => [-1.0, -2.0, 3.0],
            "pos" => [1.0, 2.0, 4.0],
        ]
        .unwrap();
        let set = generate_candidates(&dataset(&df));

        assert!(set.candidates.iter().all(|c| c.name != "log(neg)"));
        assert!(set.candidates.iter().any(|c| c.name == "log(pos)"));
        assert_eq!(set.n_dropped, 1);
        for c in &set.candidates {
            assert!(c.values.iter().all(|v| v.is_finite()), "{} has non-finite values", c.name);
        }
    }

    #[test]
    fn test_binary_pairs_not_generated() {
        let df = df![
            "x" => [0.0, 1.0, 0.0, 1.0],
            "z" => [5.0, 5.0, 7.0, 7.0],
        ]
        .unwrap();
        let set = generate_candidates(&dataset(&df));
        assert_eq!(set.n_continuous, 0);
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn test_values_and_descriptions() {
        let df = df![
            "a" => [1.0, 4.0, 9.0],
            "b" => [2.0, 0.0, 3.0],
        ]
        .unwrap();
        let set = generate_candidates(&dataset(&df));

        let sqrt = set.candidates.iter().find(|c| c.name == "sqrt(a)").unwrap();
        assert_eq!(sqrt.values.to_vec(), vec![1.0, 2.0, 3.0]);
        assert!(sqrt.description.contains("Square root"));

        let divide = set.candidates.iter().find(|c| c.name == "a divide b").unwrap();
        assert!((divide.values[1] - 4.0 / 1e-5).abs() < 1e-6);
        assert!(divide.description.starts_with("Division of a by b."));
    }
}
