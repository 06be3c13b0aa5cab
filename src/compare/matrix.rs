//! Paired comparison of two distance matrices over their upper triangles.

use super::stats::{self, ErrorSummary};
use crate::config::{DEFAULT_ERROR_THRESHOLDS, DEFAULT_WORST_CASE_COUNT};
use crate::error::{FidelityError, Result};
use crate::parse::DistanceMatrix;
use serde::Serialize;
use std::collections::HashSet;

/// |mean difference| below this is reported as no systematic bias
pub const BIAS_EPSILON: f64 = 0.001;

/// z-value for 95% limits of agreement
const LOA_Z: f64 = 1.96;

/// Error bound whose pass fraction feeds the quality score
const QUALITY_ERROR_BOUND: f64 = 0.01;

/// Options for a matrix comparison
#[derive(Debug, Clone)]
pub struct MatrixCompareOptions {
    pub worst_case_count: usize,
    pub error_thresholds: Vec<f64>,
}

impl Default for MatrixCompareOptions {
    fn default() -> Self {
        Self {
            worst_case_count: DEFAULT_WORST_CASE_COUNT,
            error_thresholds: DEFAULT_ERROR_THRESHOLDS.to_vec(),
        }
    }
}

/// How the two label lists were matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelAlignment {
    Exact,
    /// Matched after stripping directory prefixes
    Basename,
}

/// Text after the last `/`
pub fn basename(label: &str) -> &str {
    label.rsplit('/').next().unwrap_or(label)
}

/// Check that both matrices describe the same labels in the same order.
///
/// Exact equality passes; otherwise basenames are compared once. Duplicate
/// basenames make the fallback ambiguous and are rejected.
pub fn align_labels(reference: &[String], candidate: &[String]) -> Result<LabelAlignment> {
    if reference.len() != candidate.len() {
        return Err(FidelityError::ShapeMismatch(format!(
            "reference has {} genomes, candidate has {}",
            reference.len(),
            candidate.len()
        )));
    }
    if reference == candidate {
        return Ok(LabelAlignment::Exact);
    }

    log::warn!("Genome names don't match exactly, attempting basename alignment");
    let ref_names: Vec<&str> = reference.iter().map(|l| basename(l)).collect();
    let cand_names: Vec<&str> = candidate.iter().map(|l| basename(l)).collect();

    for (side, names) in [("reference", &ref_names), ("candidate", &cand_names)] {
        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|n| !seen.insert(**n)) {
            return Err(FidelityError::ShapeMismatch(format!(
                "duplicate basename {:?} in {} labels, cannot align",
                dup, side
            )));
        }
    }

    if let Some(i) = (0..ref_names.len()).find(|&i| ref_names[i] != cand_names[i]) {
        return Err(FidelityError::ShapeMismatch(format!(
            "cannot align genomes: position {} is {:?} in reference but {:?} in candidate",
            i + 1,
            ref_names[i],
            cand_names[i]
        )));
    }
    Ok(LabelAlignment::Basename)
}

/// Share of errors strictly below one threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdFraction {
    pub threshold: f64,
    pub count: usize,
    pub fraction: f64,
}

impl ThresholdFraction {
    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }
}

/// Direction of systematic difference (reference − candidate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasVerdict {
    NoBias,
    /// Candidate distances are systematically smaller
    Underestimates,
    /// Candidate distances are systematically larger
    Overestimates,
}

/// Bland–Altman agreement analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiasAnalysis {
    pub mean_diff: f64,
    pub std_diff: f64,
    pub lower_loa: f64,
    pub upper_loa: f64,
    pub verdict: BiasVerdict,
}

impl BiasAnalysis {
    /// `signed_diffs` are reference − candidate
    pub fn from_differences(signed_diffs: &[f64]) -> Self {
        let mean_diff = stats::mean(signed_diffs);
        let std_diff = stats::std_dev(signed_diffs);
        let verdict = if mean_diff.abs() < BIAS_EPSILON {
            BiasVerdict::NoBias
        } else if mean_diff > 0.0 {
            BiasVerdict::Underestimates
        } else {
            BiasVerdict::Overestimates
        };
        Self {
            mean_diff,
            std_diff,
            lower_loa: mean_diff - LOA_Z * std_diff,
            upper_loa: mean_diff + LOA_Z * std_diff,
            verdict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Excellent,
    Good,
    Moderate,
}

impl CorrelationStrength {
    pub fn from_pearson(r: f64) -> Self {
        if r > 0.99 {
            Self::Excellent
        } else if r > 0.95 {
            Self::Good
        } else {
            Self::Moderate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityRating {
    pub fn from_score(score: f64) -> Self {
        if score > 0.95 {
            Self::Excellent
        } else if score > 0.85 {
            Self::Good
        } else if score > 0.70 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// One label pair ranked by absolute error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorstCase {
    pub label_a: String,
    pub label_b: String,
    pub reference: f64,
    pub candidate: f64,
    pub abs_error: f64,
    /// 100 × abs_error / reference, 0 when the reference distance is 0
    pub rel_error_pct: f64,
}

/// Flattened upper triangles, kept for plotting
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PairedValues {
    pub reference: Vec<f64>,
    pub candidate: Vec<f64>,
}

impl PairedValues {
    /// reference − candidate per pair
    pub fn signed_differences(&self) -> Vec<f64> {
        self.reference.iter().zip(&self.candidate).map(|(r, c)| r - c).collect()
    }

    pub fn absolute_errors(&self) -> Vec<f64> {
        self.reference.iter().zip(&self.candidate).map(|(r, c)| (r - c).abs()).collect()
    }

    /// (r + c) / 2 per pair, the x axis of a Bland–Altman plot
    pub fn pair_means(&self) -> Vec<f64> {
        self.reference.iter().zip(&self.candidate).map(|(r, c)| (r + c) / 2.0).collect()
    }
}

/// Full result of comparing two distance matrices
#[derive(Debug, Clone, Serialize)]
pub struct MatrixComparison {
    pub genome_count: usize,
    pub alignment: LabelAlignment,
    /// Absolute error distribution; `mean` is the MAE and `rms` the RMSE
    pub errors: ErrorSummary,
    pub thresholds: Vec<ThresholdFraction>,
    pub pearson: f64,
    pub spearman: f64,
    pub correlation: CorrelationStrength,
    pub bias: BiasAnalysis,
    pub worst_cases: Vec<WorstCase>,
    pub quality_score: f64,
    pub rating: QualityRating,
    #[serde(skip)]
    pub pairs: PairedValues,
}

impl MatrixComparison {
    pub fn mae(&self) -> f64 {
        self.errors.mean
    }

    pub fn rmse(&self) -> f64 {
        self.errors.rms
    }
}

/// Weighted summary of correlation, small-error share and MAE, clamped to [0, 1].
/// An undefined input scores 0.
pub fn quality_score(pearson: f64, fraction_small_error: f64, mae: f64) -> f64 {
    let score = pearson * 0.5 + fraction_small_error * 0.3 + (1.0 - (mae * 10.0).min(1.0)) * 0.2;
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Compare a candidate distance matrix with the reference matrix
pub fn compare_matrices(
    reference: &DistanceMatrix,
    candidate: &DistanceMatrix,
    options: &MatrixCompareOptions,
) -> Result<MatrixComparison> {
    let alignment = align_labels(reference.labels(), candidate.labels())?;

    let pairs = PairedValues {
        reference: reference.upper_triangle(),
        candidate: candidate.upper_triangle(),
    };
    let abs_errors = pairs.absolute_errors();
    let errors = ErrorSummary::from_errors(&abs_errors);

    let fraction_below = |threshold: f64| {
        let count = abs_errors.iter().filter(|e| **e < threshold).count();
        let fraction = if abs_errors.is_empty() {
            0.0
        } else {
            count as f64 / abs_errors.len() as f64
        };
        ThresholdFraction { threshold, count, fraction }
    };
    let thresholds = options.error_thresholds.iter().map(|&t| fraction_below(t)).collect();

    let pearson = stats::pearson(&pairs.reference, &pairs.candidate);
    let spearman = stats::spearman(&pairs.reference, &pairs.candidate);
    let bias = BiasAnalysis::from_differences(&pairs.signed_differences());
    let worst_cases = worst_cases(reference, candidate, options.worst_case_count);
    let quality_score = quality_score(pearson, fraction_below(QUALITY_ERROR_BOUND).fraction, errors.mean);

    log::info!(
        "Compared {} genome pairs: MAE {:.6}, Pearson {:.6}",
        errors.count,
        errors.mean,
        pearson
    );

    Ok(MatrixComparison {
        genome_count: reference.len(),
        alignment,
        errors,
        thresholds,
        pearson,
        spearman,
        correlation: CorrelationStrength::from_pearson(pearson),
        bias,
        worst_cases,
        quality_score,
        rating: QualityRating::from_score(quality_score),
        pairs,
    })
}

/// The `n` label pairs with the largest absolute error, largest first
pub fn worst_cases(reference: &DistanceMatrix, candidate: &DistanceMatrix, n: usize) -> Vec<WorstCase> {
    let labels = reference.labels();
    let mut cases: Vec<WorstCase> = reference
        .upper_pairs()
        .map(|(i, j)| {
            let r = reference.get(i, j);
            let c = candidate.get(i, j);
            let abs_error = (r - c).abs();
            WorstCase {
                label_a: labels[i].clone(),
                label_b: labels[j].clone(),
                reference: r,
                candidate: c,
                abs_error,
                rel_error_pct: if r > 0.0 { 100.0 * abs_error / r } else { 0.0 },
            }
        })
        .collect();
    cases.sort_by(|a, b| b.abs_error.total_cmp(&a.abs_error));
    cases.truncate(n);
    cases
}
