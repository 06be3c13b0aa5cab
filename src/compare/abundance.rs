//! Abundance comparison over identifiers present in both results.

use super::set::{compare_sets, ratio, SetComparison};
use super::stats;
use crate::parse::{AbundanceMap, ColorAbundanceMap, ColoredQueryResult};
use serde::Serialize;
use std::collections::BTreeSet;

/// Abundance of one shared identifier in both inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbundanceDifference {
    pub identifier: String,
    pub reference: u64,
    pub candidate: u64,
    /// candidate − reference, saturated to the i64 range
    pub diff: i64,
    pub abs_diff: u64,
    /// |diff| / reference × 100, 0 when the reference abundance is 0
    pub rel_diff_pct: f64,
}

impl AbundanceDifference {
    pub fn new(identifier: &str, reference: u64, candidate: u64) -> Self {
        let wide = candidate as i128 - reference as i128;
        let diff = i64::try_from(wide).unwrap_or(if wide > 0 { i64::MAX } else { i64::MIN });
        let abs_diff = candidate.abs_diff(reference);
        let rel_diff_pct = if reference > 0 {
            abs_diff as f64 / reference as f64 * 100.0
        } else {
            0.0
        };
        Self {
            identifier: identifier.to_string(),
            reference,
            candidate,
            diff,
            abs_diff,
            rel_diff_pct,
        }
    }
}

/// Presence/absence plus abundance agreement between two abundance tables
#[derive(Debug, Clone, Serialize)]
pub struct AbundanceComparison {
    pub presence: SetComparison<String>,
    /// One entry per shared identifier, ordered by identifier
    pub differences: Vec<AbundanceDifference>,
    pub mean_abs_diff: f64,
    pub mean_rel_diff_pct: f64,
    pub max_abs_diff: u64,
    /// Shared identifiers whose abundance is exactly equal
    pub identical_abundance: usize,
    /// Abundances of false positives (candidate values)
    pub false_positive_abundance: Vec<(String, u64)>,
    /// Abundances of false negatives (reference values)
    pub false_negative_abundance: Vec<(String, u64)>,
}

impl AbundanceComparison {
    /// Fraction of shared identifiers with identical abundance (0 when none are shared)
    pub fn identical_fraction(&self) -> f64 {
        ratio(self.identical_abundance as f64, self.differences.len() as f64)
    }

    /// Shared identifiers whose abundance changed, largest |diff| first
    pub fn differing(&self) -> Vec<&AbundanceDifference> {
        let mut out: Vec<&AbundanceDifference> = self.differences.iter().filter(|d| d.diff != 0).collect();
        out.sort_by(|a, b| b.abs_diff.cmp(&a.abs_diff).then_with(|| a.identifier.cmp(&b.identifier)));
        out
    }
}

fn key_set(map: &AbundanceMap) -> BTreeSet<String> {
    map.keys().cloned().collect()
}

/// Compare candidate abundances against the reference
pub fn compare_abundances(reference: &AbundanceMap, candidate: &AbundanceMap) -> AbundanceComparison {
    let presence = compare_sets(&key_set(reference), &key_set(candidate));

    let differences: Vec<AbundanceDifference> = presence
        .in_both
        .iter()
        .map(|id| AbundanceDifference::new(id, reference[id], candidate[id]))
        .collect();

    let abs: Vec<f64> = differences.iter().map(|d| d.abs_diff as f64).collect();
    let rel: Vec<f64> = differences.iter().map(|d| d.rel_diff_pct).collect();

    let false_positive_abundance = presence
        .only_in_candidate
        .iter()
        .map(|id| (id.clone(), candidate[id]))
        .collect();
    let false_negative_abundance = presence
        .only_in_reference
        .iter()
        .map(|id| (id.clone(), reference[id]))
        .collect();

    AbundanceComparison {
        mean_abs_diff: stats::mean(&abs),
        mean_rel_diff_pct: stats::mean(&rel),
        max_abs_diff: differences.iter().map(|d| d.abs_diff).max().unwrap_or(0),
        identical_abundance: differences.iter().filter(|d| d.abs_diff == 0).count(),
        differences,
        false_positive_abundance,
        false_negative_abundance,
        presence,
    }
}

/// Count per color in both results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorDifference {
    pub color_id: u64,
    pub reference: u64,
    pub candidate: u64,
    pub abs_diff: u64,
    /// abs_diff / max(reference, candidate), 0 when both are 0
    pub relative_diff: f64,
}

/// Per-color comparison over the union of colors seen in either result
pub fn compare_color_abundances(reference: &ColorAbundanceMap, candidate: &ColorAbundanceMap) -> Vec<ColorDifference> {
    let colors: BTreeSet<u64> = reference.keys().chain(candidate.keys()).copied().collect();
    colors
        .into_iter()
        .map(|color_id| {
            let r = reference.get(&color_id).copied().unwrap_or(0);
            let c = candidate.get(&color_id).copied().unwrap_or(0);
            let abs_diff = r.abs_diff(c);
            ColorDifference {
                color_id,
                reference: r,
                candidate: c,
                abs_diff,
                relative_diff: ratio(abs_diff as f64, r.max(c) as f64),
            }
        })
        .collect()
}

/// Record counts of one colored query result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordCounts {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
}

impl From<&ColoredQueryResult> for RecordCounts {
    fn from(result: &ColoredQueryResult) -> Self {
        Self {
            total: result.total,
            found: result.found,
            not_found: result.not_found(),
        }
    }
}

/// Sequence presence and per-color abundance between two colored query results
#[derive(Debug, Clone, Serialize)]
pub struct ColoredComparison {
    pub reference_records: RecordCounts,
    pub candidate_records: RecordCounts,
    pub sequences: SetComparison<String>,
    pub colors: Vec<ColorDifference>,
}

impl ColoredComparison {
    /// Colors whose counts differ between the two results
    pub fn differing_colors(&self) -> usize {
        self.colors.iter().filter(|c| c.abs_diff > 0).count()
    }
}

pub fn compare_colored(reference: &ColoredQueryResult, candidate: &ColoredQueryResult) -> ColoredComparison {
    ColoredComparison {
        reference_records: reference.into(),
        candidate_records: candidate.into(),
        sequences: compare_sets(&reference.sequence_set(), &candidate.sequence_set()),
        colors: compare_color_abundances(&reference.colors, &candidate.colors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, u64)]) -> AbundanceMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_shared_identifier_statistics() {
        let cmp = compare_abundances(&map(&[("a", 10), ("b", 20)]), &map(&[("a", 10), ("b", 15)]));
        assert_eq!(cmp.identical_abundance, 1);
        assert_eq!(cmp.identical_fraction(), 0.5);
        assert!((cmp.mean_abs_diff - 2.5).abs() < 1e-12);
        assert!((cmp.mean_rel_diff_pct - 12.5).abs() < 1e-12);
        assert_eq!(cmp.max_abs_diff, 5);
        assert_eq!(cmp.differences[1].diff, -5);
    }

    #[test]
    fn test_zero_reference_abundance_has_zero_relative_diff() {
        let d = AbundanceDifference::new("x", 0, 7);
        assert_eq!(d.rel_diff_pct, 0.0);
        assert_eq!(d.abs_diff, 7);
        assert_eq!(d.diff, 7);
    }

    #[test]
    fn test_extreme_abundances_keep_sign() {
        let up = AbundanceDifference::new("x", 0, u64::MAX);
        assert_eq!(up.diff, i64::MAX);
        assert_eq!(up.abs_diff, u64::MAX);

        let down = AbundanceDifference::new("y", u64::MAX, i64::MAX as u64);
        assert!(down.diff < 0);
        assert_eq!(down.abs_diff, u64::MAX - i64::MAX as u64);
    }

    #[test]
    fn test_presence_and_fp_fn_abundances() {
        let cmp = compare_abundances(&map(&[("a", 1), ("gone", 4)]), &map(&[("a", 1), ("new", 9)]));
        assert_eq!(cmp.presence.true_positives, 1);
        assert_eq!(cmp.false_positive_abundance, vec![("new".to_string(), 9)]);
        assert_eq!(cmp.false_negative_abundance, vec![("gone".to_string(), 4)]);
    }

    #[test]
    fn test_differing_sorted_by_magnitude() {
        let cmp = compare_abundances(
            &map(&[("a", 10), ("b", 10), ("c", 10), ("d", 10)]),
            &map(&[("a", 12), ("b", 1), ("c", 10), ("d", 8)]),
        );
        let ids: Vec<&str> = cmp.differing().iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "d"]);
    }

    #[test]
    fn test_no_shared_identifiers() {
        let cmp = compare_abundances(&map(&[("a", 1)]), &map(&[]));
        assert_eq!(cmp.mean_abs_diff, 0.0);
        assert_eq!(cmp.max_abs_diff, 0);
        assert_eq!(cmp.identical_fraction(), 0.0);
    }

    #[test]
    fn test_color_abundance_union() {
        let reference: ColorAbundanceMap = [(1, 10), (2, 5)].into_iter().collect();
        let candidate: ColorAbundanceMap = [(2, 5), (3, 4)].into_iter().collect();
        let diffs = compare_color_abundances(&reference, &candidate);
        assert_eq!(diffs.len(), 3);
        assert_eq!(diffs[0].abs_diff, 10);
        assert_eq!(diffs[0].relative_diff, 1.0);
        assert_eq!(diffs[1].abs_diff, 0);
        assert_eq!(diffs[1].relative_diff, 0.0);
        assert_eq!(diffs[2].candidate, 4);
    }

    #[test]
    fn test_compare_colored_results() {
        use crate::parse::{ColoredParser, ResultParser};
        let parser = ColoredParser::new();
        let reference = parser
            .parse_str(">q C:1:3\nACGT\n>q C:2:1\nTTTT\n>q\nGGGG\n")
            .unwrap()
            .into_data();
        let candidate = parser.parse_str(">q C:1:3\nACGT\n>q C:2:2\nCCCC\n").unwrap().into_data();

        let cmp = compare_colored(&reference, &candidate);
        assert_eq!(cmp.reference_records, RecordCounts { total: 3, found: 2, not_found: 1 });
        assert_eq!(cmp.sequences.true_positives, 1);
        assert_eq!(cmp.sequences.false_negatives, 2);
        assert_eq!(cmp.sequences.false_positives, 1);
        assert_eq!(cmp.colors.len(), 2);
        assert_eq!(cmp.differing_colors(), 1);
    }
}
