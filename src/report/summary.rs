//! Aggregation of many per-pair comparisons into one batch summary.

use super::{write_json, Report};
use crate::compare::SetComparison;
use crate::error::Result;
use crate::pipeline::StepOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const SUMMARY_TEXT_FILE: &str = "analysis_summary.txt";
pub const SUMMARY_JSON_FILE: &str = "query_analysis_results.json";

/// Presence/absence figures of one comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceFigures {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub identical: bool,
}

impl<T: Ord> From<&SetComparison<T>> for PresenceFigures {
    fn from(cmp: &SetComparison<T>) -> Self {
        Self {
            true_positives: cmp.true_positives,
            false_positives: cmp.false_positives,
            false_negatives: cmp.false_negatives,
            precision: cmp.precision,
            recall: cmp.recall,
            f1_score: cmp.f1_score,
            identical: cmp.is_identical(),
        }
    }
}

/// One completed comparison in a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub reference_path: PathBuf,
    pub candidate_path: PathBuf,
    /// Absent for distance matrices
    pub presence: Option<PresenceFigures>,
    /// Only set for distance matrices
    pub quality_score: Option<f64>,
    /// Full serialized comparison
    pub details: serde_json::Value,
}

/// A pair that could not be compared
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedPair {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub generated_at: DateTime<Utc>,
    pub format: String,
    pub steps: Vec<StepOutcome>,
    pub entries: Vec<BatchEntry>,
    pub skipped: Vec<SkippedPair>,
}

fn average<I: Iterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl BatchSummary {
    pub fn new(format: &str) -> Self {
        Self {
            generated_at: Utc::now(),
            format: format.to_string(),
            steps: Vec::new(),
            entries: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: BatchEntry) {
        self.entries.push(entry);
    }

    pub fn skip(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        let skipped = SkippedPair {
            name: name.into(),
            reason: reason.into(),
        };
        log::warn!("Skipping {}: {}", skipped.name, skipped.reason);
        self.skipped.push(skipped);
    }

    fn presence(&self) -> impl Iterator<Item = &PresenceFigures> {
        self.entries.iter().filter_map(|e| e.presence.as_ref())
    }

    pub fn average_precision(&self) -> Option<f64> {
        average(self.presence().map(|p| p.precision))
    }

    pub fn average_recall(&self) -> Option<f64> {
        average(self.presence().map(|p| p.recall))
    }

    pub fn average_f1(&self) -> Option<f64> {
        average(self.presence().map(|p| p.f1_score))
    }

    pub fn average_quality_score(&self) -> Option<f64> {
        average(self.entries.iter().filter_map(|e| e.quality_score))
    }

    pub fn identical_count(&self) -> usize {
        self.presence().filter(|p| p.identical).count()
    }

    pub fn to_report(&self) -> Report {
        let mut report = Report::new();
        report.heading("BATCH COMPARISON SUMMARY");
        report.line(format!("Generated at: {}", self.generated_at.to_rfc3339()));
        report.line(format!("Format:       {}", self.format));
        report.blank();

        if !self.steps.is_empty() {
            report.line("### PRE-STEPS ###");
            for step in &self.steps {
                let status = if step.success { "ok" } else { "FAILED" };
                report.line(format!("[{}] {}", status, step.command));
            }
            report.blank();
        }

        report.line("### OVERVIEW ###");
        report.line(format!("Comparisons completed: {}", self.entries.len()));
        report.line(format!("Pairs skipped:         {}", self.skipped.len()));
        if let (Some(p), Some(r), Some(f)) = (self.average_precision(), self.average_recall(), self.average_f1()) {
            report.line(format!("Identical results:     {}", self.identical_count()));
            report.line(format!("Average precision:     {:.4}", p));
            report.line(format!("Average recall:        {:.4}", r));
            report.line(format!("Average F1 score:      {:.4}", f));
        }
        if let Some(q) = self.average_quality_score() {
            report.line(format!("Average quality score: {:.3}", q));
        }
        report.blank();

        if !self.entries.is_empty() {
            report.line("### PER-PAIR RESULTS ###");
            for entry in &self.entries {
                match (&entry.presence, entry.quality_score) {
                    (Some(p), _) => report.line(format!(
                        "{}: TP={} FP={} FN={} P={:.4} R={:.4} F1={:.4}",
                        entry.name, p.true_positives, p.false_positives, p.false_negatives, p.precision, p.recall, p.f1_score
                    )),
                    (None, Some(q)) => report.line(format!("{}: quality score {:.3}", entry.name, q)),
                    (None, None) => report.line(entry.name.clone()),
                }
            }
            report.blank();
        }

        if !self.skipped.is_empty() {
            report.line("### SKIPPED ###");
            for s in &self.skipped {
                report.line(format!("{}: {}", s.name, s.reason));
            }
            report.blank();
        }

        report.banner();
        report
    }

    /// Write the text summary and the JSON dump into `out_dir`
    pub fn write(&self, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let text_path = out_dir.join(SUMMARY_TEXT_FILE);
        let json_path = out_dir.join(SUMMARY_JSON_FILE);
        self.to_report().write_to(&text_path)?;
        write_json(&json_path, self)?;
        Ok((text_path, json_path))
    }
}
