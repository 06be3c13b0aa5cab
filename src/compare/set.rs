//! Presence/absence comparison treating the reference as ground truth.

use serde::Serialize;
use std::collections::BTreeSet;

/// Confusion counts and the identifier sets behind them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetComparison<T: Ord> {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Present in both inputs
    pub in_both: BTreeSet<T>,
    /// Present only in the candidate (false positives)
    pub only_in_candidate: BTreeSet<T>,
    /// Present only in the reference (false negatives)
    pub only_in_reference: BTreeSet<T>,
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Compare a candidate set against the reference set
pub fn compare_sets<T: Ord + Clone>(reference: &BTreeSet<T>, candidate: &BTreeSet<T>) -> SetComparison<T> {
    let in_both: BTreeSet<T> = reference.intersection(candidate).cloned().collect();
    let only_in_candidate: BTreeSet<T> = candidate.difference(reference).cloned().collect();
    let only_in_reference: BTreeSet<T> = reference.difference(candidate).cloned().collect();

    let tp = in_both.len();
    let fp = only_in_candidate.len();
    let fn_ = only_in_reference.len();

    let precision = ratio(tp as f64, (tp + fp) as f64);
    let recall = ratio(tp as f64, (tp + fn_) as f64);
    let f1_score = ratio(2.0 * precision * recall, precision + recall);

    SetComparison {
        true_positives: tp,
        false_positives: fp,
        false_negatives: fn_,
        precision,
        recall,
        f1_score,
        in_both,
        only_in_candidate,
        only_in_reference,
    }
}

impl<T: Ord> SetComparison<T> {
    pub fn reference_total(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    pub fn candidate_total(&self) -> usize {
        self.true_positives + self.false_positives
    }

    pub fn is_identical(&self) -> bool {
        self.false_positives == 0 && self.false_negatives == 0
    }

    /// Shared identifiers as a percentage of the reference
    pub fn both_pct_of_reference(&self) -> f64 {
        100.0 * ratio(self.true_positives as f64, self.reference_total() as f64)
    }

    /// Shared identifiers as a percentage of the candidate
    pub fn both_pct_of_candidate(&self) -> f64 {
        100.0 * ratio(self.true_positives as f64, self.candidate_total() as f64)
    }

    /// Missed identifiers as a percentage of the reference
    pub fn false_negative_pct(&self) -> f64 {
        100.0 * ratio(self.false_negatives as f64, self.reference_total() as f64)
    }

    /// Spurious identifiers as a percentage of the candidate
    pub fn false_positive_pct(&self) -> f64 {
        100.0 * ratio(self.false_positives as f64, self.candidate_total() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_overlapping_sets() {
        let cmp = compare_sets(&set(&[1, 2, 3, 4]), &set(&[2, 3, 4, 5]));
        assert_eq!(cmp.true_positives, 3);
        assert_eq!(cmp.false_positives, 1);
        assert_eq!(cmp.false_negatives, 1);
        assert!((cmp.precision - 0.75).abs() < 1e-12);
        assert!((cmp.recall - 0.75).abs() < 1e-12);
        assert!((cmp.f1_score - 0.75).abs() < 1e-12);
        assert_eq!(cmp.only_in_candidate, set(&[5]));
        assert_eq!(cmp.only_in_reference, set(&[1]));
    }

    #[test]
    fn test_identical_sets() {
        let cmp = compare_sets(&set(&[7, 8]), &set(&[7, 8]));
        assert_eq!(cmp.precision, 1.0);
        assert_eq!(cmp.recall, 1.0);
        assert_eq!(cmp.f1_score, 1.0);
        assert!(cmp.is_identical());
    }

    #[test]
    fn test_empty_inputs_never_divide_by_zero() {
        let cmp = compare_sets(&set(&[]), &set(&[]));
        assert_eq!(cmp.precision, 0.0);
        assert_eq!(cmp.recall, 0.0);
        assert_eq!(cmp.f1_score, 0.0);
        assert_eq!(cmp.both_pct_of_reference(), 0.0);
        assert_eq!(cmp.false_positive_pct(), 0.0);
    }

    #[test]
    fn test_disjoint_sets() {
        let cmp = compare_sets(&set(&[1, 2]), &set(&[3]));
        assert_eq!(cmp.true_positives, 0);
        assert_eq!(cmp.f1_score, 0.0);
        assert_eq!(cmp.false_negative_pct(), 100.0);
        assert_eq!(cmp.false_positive_pct(), 100.0);
    }

    #[test]
    fn test_percentages() {
        let cmp = compare_sets(&set(&[1, 2, 3, 4]), &set(&[1, 2]));
        assert_eq!(cmp.both_pct_of_reference(), 50.0);
        assert_eq!(cmp.both_pct_of_candidate(), 100.0);
        assert_eq!(cmp.reference_total(), 4);
        assert_eq!(cmp.candidate_total(), 2);
    }

    #[test]
    fn test_string_identifiers() {
        let reference: BTreeSet<String> = ["ACGT", "TTGA"].iter().map(|s| s.to_string()).collect();
        let candidate: BTreeSet<String> = ["ACGT"].iter().map(|s| s.to_string()).collect();
        let cmp = compare_sets(&reference, &candidate);
        assert_eq!(cmp.precision, 1.0);
        assert_eq!(cmp.recall, 0.5);
    }
}
