//! Search results

use crate::error::Result;
use crate::task::TaskType;
use crate::training::CVResults;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One feature that beat the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub feature: String,
    /// Mean cross-validated score with the feature added
    pub score: f64,
    pub std: f64,
    /// `score` minus the baseline mean, always positive
    pub improvement: f64,
    pub description: String,
}

/// Ranked result records, best improvement first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    records: Vec<ResultRecord>,
}

impl ResultTable {
    /// Sorts `records` by descending improvement; ties keep their order
    pub fn from_records(mut records: Vec<ResultRecord>) -> Self {
        records.sort_by(|a, b| b.improvement.total_cmp(&a.improvement));
        Self { records }
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn best(&self) -> Option<&ResultRecord> {
        self.records.first()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    /// Columns `feature, score, std, improvement, description`; zero rows when empty
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let feature: Vec<&str> = self.records.iter().map(|r| r.feature.as_str()).collect();
        let score: Vec<f64> = self.records.iter().map(|r| r.score).collect();
        let std: Vec<f64> = self.records.iter().map(|r| r.std).collect();
        let improvement: Vec<f64> = self.records.iter().map(|r| r.improvement).collect();
        let description: Vec<&str> = self.records.iter().map(|r| r.description.as_str()).collect();

        Ok(DataFrame::new(vec![
            Series::new("feature".into(), feature).into(),
            Series::new("score".into(), score).into(),
            Series::new("std".into(), std).into(),
            Series::new("improvement".into(), improvement).into(),
            Series::new("description".into(), description).into(),
        ])?)
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A candidate whose evaluation failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedCandidate {
    pub feature: String,
    pub reason: String,
}

/// Outcome of evaluating one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Scored(CVResults),
    Skipped(String),
}

/// Everything a finished search produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub task_type: TaskType,
    pub baseline: CVResults,
    pub results: ResultTable,
    /// Valid candidates after filtering
    pub candidates_generated: usize,
    /// Candidates attempted before the search ended
    pub candidates_tested: usize,
    pub skipped: Vec<SkippedCandidate>,
    pub time_limit_reached: bool,
}

impl SearchReport {
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        self.results.to_dataframe()
    }

    /// Display label of the metric used for every score
    pub fn metric_label(&self) -> &'static str {
        match self.task_type {
            TaskType::Classification => "Accuracy",
            TaskType::Regression => "R2",
        }
    }
}
