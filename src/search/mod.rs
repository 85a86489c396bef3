//! Feature search
//!
//! Runs the whole pipeline for one dataset: validate, detect the task,
//! score the baseline, then score each generated candidate in random order
//! until the candidates or the time budget run out.

mod config;
mod engine;
mod results;

pub use config::SearchConfig;
pub use engine::{FeatureSearch, SearchState};
pub use results::{CandidateOutcome, ResultRecord, ResultTable, SearchReport, SkippedCandidate};
