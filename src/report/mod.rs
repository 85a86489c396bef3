//! Results reporting
//!
//! A [`Reporter`] receives the ranked results once a search finishes. The
//! console reporter prints them together with a short explanation of the
//! metric and what to try next.

use crate::cli::{accent, dim, muted, ok};
use crate::search::ResultTable;
use crate::task::TaskType;
use crate::training::CVResults;
use colored::*;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// Consumer of a finished search
pub trait Reporter {
    /// Called once per run with the ranked, truncated results
    fn report(&mut self, results: &ResultTable, baseline: &CVResults, task_type: TaskType);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&mut self, _results: &ResultTable, _baseline: &CVResults, _task_type: TaskType) {}
}

/// Prints results to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    /// Full report text, styled when the terminal supports it
    pub fn render(&self, results: &ResultTable, baseline: &CVResults, task_type: TaskType) -> String {
        let metric = metric_label(task_type);
        let heavy = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "\n{}", dim(&heavy));
        let _ = writeln!(out, "{}", title(&format!("{:^width$}", "RESULTS", width = RULE_WIDTH)));
        let _ = writeln!(out, "{}", dim(&heavy));
        let _ = writeln!(
            out,
            "\nBaseline {}: {:.4} +/- {:.4}",
            metric, baseline.mean_score, baseline.std_score
        );

        if let Some(best) = results.records().first() {
            let _ = writeln!(out, "Best improvement: {}", ok(&format!("+{:.4}", best.improvement)));
        }

        let _ = writeln!(out, "\n{}", title(&format!("Top {} Transformations:", results.len())));
        let _ = writeln!(out, "{}", dim(&"-".repeat(RULE_WIDTH)));

        for (i, record) in results.records().iter().enumerate() {
            let _ = writeln!(out, "\n{}. {}", i + 1, accent(&record.feature));
            let _ = writeln!(
                out,
                "{}: {:.4} +/- {:.4} ({})",
                metric,
                record.score,
                record.std,
                ok(&format!("+{:.4}", record.improvement))
            );
            let _ = writeln!(out, "{}", muted(&record.description));
        }

        let _ = writeln!(out, "\n{}", dim(&heavy));
        let _ = writeln!(out, "\n{}", title("What does this mean?"));
        for line in explanation(task_type) {
            let _ = writeln!(out, "{}", line);
        }

        let _ = writeln!(out, "\n{}", title("Next steps:"));
        for line in NEXT_STEPS {
            let _ = writeln!(out, "{}", line);
        }
        let _ = writeln!(out, "\n{}", dim(&heavy));
        out
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, results: &ResultTable, baseline: &CVResults, task_type: TaskType) {
        print!("{}", self.render(results, baseline, task_type));
    }
}

const NEXT_STEPS: [&str; 4] = [
    "1. Try applying these transformations to your data",
    "2. Combine multiple good transformations together",
    "3. Test with other models (Random Forest, XGBoost, etc.)",
    "4. Remember: these transformations help most with linear models!",
];

fn metric_label(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::Classification => "Accuracy",
        TaskType::Regression => "R2",
    }
}

fn explanation(task_type: TaskType) -> [&'static str; 3] {
    match task_type {
        TaskType::Classification => [
            "Accuracy shows what % of predictions are correct.",
            "Higher accuracy = better model performance.",
            "+/- std shows consistency across different data splits.",
        ],
        TaskType::Regression => [
            "R2 shows what % of variation in the target the model explains.",
            "R2 = 0.8 means the model explains 80% of the pattern.",
            "+/- std shows consistency across different data splits.",
        ],
    }
}

fn title(s: &str) -> ColoredString {
    s.white().bold()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ResultRecord;

    fn table() -> ResultTable {
        ResultTable::from_records(vec![
            ResultRecord {
                feature: "sqrt(col_A)".to_string(),
                score: 0.9,
                std: 0.01,
                improvement: 0.2,
                description: "Square root of col_A.".to_string(),
            },
            ResultRecord {
                feature: "log(col_A)".to_string(),
                score: 0.8,
                std: 0.02,
                improvement: 0.1,
                description: "Log transformation of col_A.".to_string(),
            },
        ])
    }

    #[test]
    fn test_render_regression() {
        colored::control::set_override(false);
        let baseline = CVResults::from_scores(vec![0.7, 0.7]);
        let text = ConsoleReporter::new().render(&table(), &baseline, TaskType::Regression);

        assert!(text.contains("RESULTS"));
        assert!(text.contains("Baseline R2: 0.7000 +/- 0.0000"));
        assert!(text.contains("Best improvement: +0.2000"));
        assert!(text.contains("Top 2 Transformations:"));
        assert!(text.contains("1. sqrt(col_A)"));
        assert!(text.contains("R2: 0.9000 +/- 0.0100 (+0.2000)"));
        assert!(text.contains("2. log(col_A)"));
        assert!(text.contains("R2 = 0.8 means the model explains 80% of the pattern."));
        assert!(text.contains("4. Remember: these transformations help most with linear models!"));
    }

    #[test]
    fn test_render_classification() {
        colored::control::set_override(false);
        let baseline = CVResults::from_scores(vec![0.6, 0.8]);
        let text = ConsoleReporter::new().render(&table(), &baseline, TaskType::Classification);

        assert!(text.contains("Baseline Accuracy: 0.7000 +/- 0.1000"));
        assert!(text.contains("Accuracy shows what % of predictions are correct."));
        assert!(!text.contains("R2 shows"));
    }
}
