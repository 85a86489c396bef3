//! Feature engineering module
//!
//! Generates the candidate features a search evaluates:
//! - Single-column transforms (log, sqrt, square, cube)
//! - Pairwise interactions (multiply, divide)

mod candidates;
mod interactions;
mod transforms;

pub use candidates::{generate_candidates, Candidate, CandidateSet, ColumnKind, SearchSpace};
pub use interactions::{InteractionType, DIVIDE_EPSILON};
pub use transforms::UnaryTransform;
