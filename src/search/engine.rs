//! Search orchestration

use super::config::SearchConfig;
use super::results::{CandidateOutcome, ResultRecord, ResultTable, SearchReport, SkippedCandidate};
use crate::error::{AutoFeError, Result};
use crate::evaluation::FeatureEvaluator;
use crate::feature_engineering::{generate_candidates, Candidate, SearchSpace};
use crate::report::{ConsoleReporter, Reporter};
use crate::task::detect_task_type;
use crate::validation::{validate, Dataset, FeatureInput, Target, TargetInput};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Lifecycle of a [`FeatureSearch`]; an instance runs once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    BaselineComputed,
    Searching,
    Done,
}

/// Finds single transformed features that improve a linear baseline.
///
/// ```no_run
/// use eduautofe::prelude::*;
/// use polars::prelude::*;
///
/// # fn main() -> eduautofe::Result<()> {
/// let x = df!["col_A" => [1.0, 4.0, 9.0, 16.0, 25.0, 36.0, 49.0, 64.0, 81.0, 100.0]]?;
/// let y = Series::new("target".into(), [1.0, 2.1, 2.9, 4.2, 5.0, 5.8, 7.1, 8.0, 9.1, 9.9]);
///
/// let mut search = FeatureSearch::new(SearchConfig::new().with_max_results(3))?;
/// let report = search.fit(&x, &y)?;
/// for record in &report.results {
///     println!("{} (+{:.4})", record.feature, record.improvement);
/// }
/// # Ok(())
/// # }
/// ```
pub struct FeatureSearch {
    config: SearchConfig,
    state: SearchState,
    reporter: Box<dyn Reporter>,
}

impl fmt::Debug for FeatureSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureSearch")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl FeatureSearch {
    /// Create a search that prints its results to the console
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: SearchState::Idle,
            reporter: Box::new(ConsoleReporter::new()),
        })
    }

    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Run the search.
    ///
    /// Invalid input fails before any model is fitted and leaves the
    /// instance idle. Once a baseline has been computed the instance is
    /// spent and a second call returns [`AutoFeError::ConfigError`].
    pub fn fit<'a, 'b>(
        &mut self,
        x: impl Into<FeatureInput<'a>>,
        y: impl Into<TargetInput<'b>>,
    ) -> Result<SearchReport> {
        if self.state != SearchState::Idle {
            return Err(AutoFeError::ConfigError(
                "this search has already run; create a new FeatureSearch for another dataset"
                    .to_string(),
            ));
        }

        let (dataset, target) = validate(x, y)?;

        let task_type = detect_task_type(target.values());
        let evaluator = FeatureEvaluator::new(task_type).with_cv_folds(self.config.cv_folds);
        let metric = evaluator.model_spec().metric_label;
        debug!(
            folds = self.config.cv_folds,
            "Scoring with {}",
            evaluator.model_spec().model.display_name()
        );

        info!("Calculating baseline performance...");
        let baseline = evaluator.evaluate_baseline(dataset.features(), target.values())?;
        self.state = SearchState::BaselineComputed;
        info!(
            mean = baseline.mean_score,
            std = baseline.std_score,
            "Baseline {}: {:.4} +/- {:.4}",
            metric,
            baseline.mean_score,
            baseline.std_score
        );

        info!("Generating candidate transformations...");
        let space = SearchSpace::from_dataset(&dataset);
        let mut candidates = generate_candidates(&dataset).candidates;
        candidates.shuffle(&mut self.rng());
        info!(
            enumerated = space.total(),
            "Generated {} candidates",
            candidates.len()
        );

        match self.config.max_minutes {
            Some(minutes) => info!("Evaluating candidates (max {} minutes)...", minutes),
            None => info!("Evaluating candidates (exhaustive search)..."),
        }

        self.state = SearchState::Searching;
        let start = Instant::now();
        let mut tested = 0;
        let mut time_limit_reached = false;
        let mut improving = Vec::new();
        let mut skipped = Vec::new();

        for candidate in &candidates {
            if let Some(limit) = self.config.max_minutes {
                if start.elapsed().as_secs_f64() / 60.0 >= limit {
                    info!("Time limit reached ({} min)", limit);
                    time_limit_reached = true;
                    break;
                }
            }

            tested += 1;
            match evaluate_candidate(&evaluator, &dataset, &target, candidate) {
                CandidateOutcome::Scored(cv) => {
                    let improvement = cv.mean_score - baseline.mean_score;
                    debug!(candidate = %candidate.name, score = cv.mean_score, improvement, "Evaluated candidate");
                    if improvement > 0.0 {
                        improving.push(ResultRecord {
                            feature: candidate.name.clone(),
                            score: cv.mean_score,
                            std: cv.std_score,
                            improvement,
                            description: candidate.description.clone(),
                        });
                    }
                }
                CandidateOutcome::Skipped(reason) => {
                    debug!(candidate = %candidate.name, %reason, "Skipped candidate");
                    skipped.push(SkippedCandidate {
                        feature: candidate.name.clone(),
                        reason,
                    });
                }
            }
        }

        info!("Tested {} of {} candidates", tested, candidates.len());
        self.state = SearchState::Done;

        let mut results = ResultTable::from_records(improving);
        results.truncate(self.config.max_results);

        if results.is_empty() {
            info!("No improvements found over baseline.");
        } else {
            self.reporter.report(&results, &baseline, task_type);
        }

        Ok(SearchReport {
            task_type,
            baseline,
            results,
            candidates_generated: candidates.len(),
            candidates_tested: tested,
            skipped,
            time_limit_reached,
        })
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.config.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl Default for FeatureSearch {
    fn default() -> Self {
        Self {
            config: SearchConfig::default(),
            state: SearchState::Idle,
            reporter: Box::new(ConsoleReporter::new()),
        }
    }
}

/// Failures stay local to the candidate
fn evaluate_candidate(
    evaluator: &FeatureEvaluator,
    dataset: &Dataset,
    target: &Target,
    candidate: &Candidate,
) -> CandidateOutcome {
    match evaluator.evaluate_feature(dataset.features(), candidate.values.view(), target.values()) {
        Ok(cv) => CandidateOutcome::Scored(cv),
        Err(e) => CandidateOutcome::Skipped(e.to_string()),
    }
}
