//! Text layouts for each comparison kind.
//!
//! Section order is fixed: header, basic counts, presence metrics with
//! interpretation, value statistics, ranked table, false positives, false
//! negatives. Numbers are rounded here for display only.

use super::Report;
use crate::compare::matrix::{basename, BiasVerdict, CorrelationStrength, QualityRating};
use crate::compare::{AbundanceComparison, ColoredComparison, MatrixComparison, SetComparison};
use std::fmt::Display;

/// Presence/absence metrics with interpretation sentences
fn presence_section<T: Ord + Display>(report: &mut Report, cmp: &SetComparison<T>, noun: &str) {
    report.line("### PRESENCE/ABSENCE METRICS ###");
    report.line(format!("True Positives (TP):   {} ({} present in both)", cmp.true_positives, noun));
    report.line(format!("False Positives (FP):  {} ({} only in candidate)", cmp.false_positives, noun));
    report.line(format!("False Negatives (FN):  {} ({} only in reference)", cmp.false_negatives, noun));
    report.blank();
    report.line(format!("Precision:  {:.4} ({:.2}%)", cmp.precision, cmp.precision * 100.0));
    report.line(format!("Recall:     {:.4} ({:.2}%)", cmp.recall, cmp.recall * 100.0));
    report.line(format!("F1 Score:   {:.4}", cmp.f1_score));
    report.blank();
    report.line("Interpretation:");
    report.line(format!(
        "  - {:.2}% of {} in the reference were found ({} of {})",
        cmp.recall * 100.0,
        noun,
        cmp.true_positives,
        cmp.reference_total()
    ));
    report.line(format!(
        "  - {:.2}% of {} found by the candidate are correct ({} of {})",
        cmp.precision * 100.0,
        noun,
        cmp.true_positives,
        cmp.candidate_total()
    ));
    if cmp.false_positives > 0 {
        report.line(format!("  - {} {} were found erroneously (false positives)", cmp.false_positives, noun));
    }
    if cmp.false_negatives > 0 {
        report.line(format!("  - {} {} were missed (false negatives)", cmp.false_negatives, noun));
    }
    if cmp.is_identical() {
        report.line("  - Reference and candidate results are identical");
    }
    report.blank();
}

/// Numbered enumeration; `items` arrive sorted by identifier
fn enumeration<I, D>(report: &mut Report, title: &str, items: I)
where
    I: IntoIterator<Item = D>,
    D: Display,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return;
    }
    report.line(format!("### {} ###", title));
    for (i, item) in items.enumerate() {
        report.line(format!("{}. {}", i + 1, item));
    }
    report.blank();
}

/// Report for integer identifier lists
pub fn identifier_report<T: Ord + Display>(cmp: &SetComparison<T>) -> Report {
    let mut report = Report::new();
    report.heading("QUERY COMPARISON RESULTS: Compressed vs Uncompressed Index (Ground Truth)");
    report.blank();

    report.line("### BASIC STATISTICS ###");
    report.line(format!("Reference results (ground truth): {}", cmp.reference_total()));
    report.line(format!("Candidate results:                {}", cmp.candidate_total()));
    report.line(format!("Identifiers in both:              {}", cmp.true_positives));
    report.line(format!("  - As % of reference: {:.2}%", cmp.both_pct_of_reference()));
    report.line(format!("  - As % of candidate: {:.2}%", cmp.both_pct_of_candidate()));
    report.line(format!(
        "Only in reference (FN): {} ({:.2}% of reference)",
        cmp.false_negatives,
        cmp.false_negative_pct()
    ));
    report.line(format!(
        "Only in candidate (FP): {} ({:.2}% of candidate)",
        cmp.false_positives,
        cmp.false_positive_pct()
    ));
    report.blank();

    presence_section(&mut report, cmp, "identifiers");

    enumeration(&mut report, "FALSE POSITIVES (only in candidate)", cmp.only_in_candidate.iter());
    enumeration(&mut report, "FALSE NEGATIVES (only in reference)", cmp.only_in_reference.iter());

    report.banner();
    report
}

/// Report for abundance tables
pub fn abundance_report(cmp: &AbundanceComparison) -> Report {
    let presence = &cmp.presence;
    let mut report = Report::new();
    report.heading("COMPARATIVE ANALYSIS: Compressed vs Uncompressed Index (Ground Truth)");
    report.blank();

    report.line("### BASIC STATISTICS ###");
    report.line(format!("Total identifiers in reference: {}", presence.reference_total()));
    report.line(format!("Total identifiers in candidate: {}", presence.candidate_total()));
    report.blank();

    presence_section(&mut report, presence, "identifiers");

    let shared = cmp.differences.len();
    if shared > 0 {
        report.line("### ABUNDANCE ANALYSIS (for True Positives) ###");
        report.line(format!(
            "Identifiers with identical abundance:  {} / {} ({:.2}%)",
            cmp.identical_abundance,
            shared,
            cmp.identical_fraction() * 100.0
        ));
        report.line(format!("Mean absolute difference:        {:.2}", cmp.mean_abs_diff));
        report.line(format!("Mean relative difference:        {:.2}%", cmp.mean_rel_diff_pct));
        report.line(format!("Maximum absolute difference:     {}", cmp.max_abs_diff));
        report.blank();

        let differing = cmp.differing();
        if !differing.is_empty() {
            report.line(format!(
                "All identifiers with abundance differences ({}):",
                differing.len()
            ));
            report.line(format!("{:<50} {:>8} {:>8} {:>8}", "IDENTIFIER", "Ref", "Cand", "Diff"));
            report.line("-".repeat(80));
            for d in differing {
                report.line(format!(
                    "{:<50} {:>8} {:>8} {:>8}",
                    d.identifier, d.reference, d.candidate, d.diff
                ));
            }
            report.blank();
        }
    }

    enumeration(
        &mut report,
        "FALSE POSITIVES (only in candidate)",
        cmp.false_positive_abundance
            .iter()
            .map(|(id, abd)| format!("{} (abundance: {})", id, abd)),
    );
    enumeration(
        &mut report,
        "FALSE NEGATIVES (only in reference)",
        cmp.false_negative_abundance
            .iter()
            .map(|(id, abd)| format!("{} (abundance: {})", id, abd)),
    );

    report.banner();
    report
}

/// Label shortened for the worst-case table
fn short_label(label: &str) -> String {
    basename(label).chars().take(28).collect()
}

/// Report for distance matrices
pub fn matrix_report(cmp: &MatrixComparison) -> Report {
    let mut report = Report::new();
    report.heading("DISTANCE TABLE COMPARISON - COMPRESSION QUALITY ANALYSIS");
    report.blank();
    report.line(format!("Genomes compared:  {}", cmp.genome_count));
    report.line(format!("Label alignment:   {:?}", cmp.alignment));
    report.blank();

    report.heading("1. ERROR STATISTICS");
    let e = &cmp.errors;
    report.line(format!("{:<25}: {:>8.6}", "MAE", e.mean));
    report.line(format!("{:<25}: {:>8.6}", "RMSE", e.rms));
    report.line(format!("{:<25}: {:>8.6}", "Max Error", e.max));
    report.line(format!("{:<25}: {:>8.6}", "Min Error", e.min));
    report.line(format!("{:<25}: {:>8.6}", "Median Error", e.median));
    report.line(format!("{:<25}: {:>8.6}", "Std Error", e.std_dev));
    report.line(format!("{:<25}: {:>8}", "Total Comparisons", e.count));
    for t in &cmp.thresholds {
        report.line(format!("{:<25}: {:>8.2}%", format!("% < {}", t.threshold), t.percent()));
    }
    report.blank();

    report.heading("2. CORRELATION ANALYSIS");
    report.line(format!("Pearson correlation:  {:.6}", cmp.pearson));
    report.line(format!("Spearman correlation: {:.6}", cmp.spearman));
    report.line(match cmp.correlation {
        CorrelationStrength::Excellent => "Excellent correlation - compression preserves distances very well",
        CorrelationStrength::Good => "Good correlation - compression quality is acceptable",
        CorrelationStrength::Moderate => "Moderate correlation - significant information loss in compression",
    });
    report.blank();

    report.heading("3. BLAND-ALTMAN ANALYSIS");
    let b = &cmp.bias;
    report.line(format!("Mean difference (reference - candidate): {:.6}", b.mean_diff));
    report.line(format!("Std of differences:                      {:.6}", b.std_diff));
    report.line(format!(
        "Limits of Agreement:                     [{:.6}, {:.6}]",
        b.lower_loa, b.upper_loa
    ));
    report.line(match b.verdict {
        BiasVerdict::NoBias => "No systematic bias detected",
        BiasVerdict::Underestimates => "Systematic bias: compression tends to UNDERESTIMATE distances",
        BiasVerdict::Overestimates => "Systematic bias: compression tends to OVERESTIMATE distances",
    });
    report.blank();

    report.heading(&format!("4. WORST CASES (Top {} largest differences)", cmp.worst_cases.len()));
    report.line(format!(
        "{:<5} {:<30} {:<30} {:<10} {:<10} {:<10} {:<10}",
        "Rank", "Genome 1", "Genome 2", "Reference", "Candidate", "Diff", "Rel.Err%"
    ));
    report.line("-".repeat(110));
    for (i, w) in cmp.worst_cases.iter().enumerate() {
        report.line(format!(
            "{:<5} {:<30} {:<30} {:<10.6} {:<10.6} {:<10.6} {:<10.2}",
            i + 1,
            short_label(&w.label_a),
            short_label(&w.label_b),
            w.reference,
            w.candidate,
            w.abs_error,
            w.rel_error_pct
        ));
    }
    report.blank();

    report.heading("SUMMARY");
    report.line("Compression Quality Score:");
    report.line(format!("  - Correlation: {:.4} (higher is better, max 1.0)", cmp.pearson));
    report.line(format!("  - MAE: {:.6} (lower is better)", cmp.mae()));
    if let Some(t) = cmp.thresholds.iter().find(|t| t.threshold == 0.01) {
        report.line(format!("  - {:.1}% of distances have error < 0.01", t.percent()));
    }
    report.blank();
    report.line(format!("Overall Quality Score: {:.3} / 1.000", cmp.quality_score));
    report.line(match cmp.rating {
        QualityRating::Excellent => "Rating: EXCELLENT - Compression is nearly lossless",
        QualityRating::Good => "Rating: GOOD - Compression preserves most information",
        QualityRating::Fair => "Rating: FAIR - Noticeable information loss",
        QualityRating::Poor => "Rating: POOR - Significant information loss",
    });
    report.banner();
    report
}

/// Report for one colored-sequence query: sequence presence plus per-color counts
pub fn colored_report(query_name: &str, cmp: &ColoredComparison) -> Report {
    let seqs = &cmp.sequences;
    let mut report = Report::new();
    report.heading(&format!("COLORED QUERY COMPARISON: {}", query_name));
    report.blank();
    report.line("### BASIC STATISTICS ###");
    for (side, counts) in [("Reference", &cmp.reference_records), ("Candidate", &cmp.candidate_records)] {
        report.line(format!(
            "{} records: {} (found: {}, not found: {})",
            side, counts.total, counts.found, counts.not_found
        ));
    }
    report.line(format!("Distinct sequences in reference: {}", seqs.reference_total()));
    report.line(format!("Distinct sequences in candidate: {}", seqs.candidate_total()));
    report.blank();

    presence_section(&mut report, seqs, "sequences");

    if !cmp.colors.is_empty() {
        report.line(format!(
            "### COLOR ABUNDANCE ({} distinct colors, {} differing) ###",
            cmp.colors.len(),
            cmp.differing_colors()
        ));
        report.line(format!("{:<10} {:>10} {:>10} {:>10} {:>10}", "Color", "Ref", "Cand", "Diff", "RelDiff"));
        report.line("-".repeat(54));
        for c in &cmp.colors {
            report.line(format!(
                "{:<10} {:>10} {:>10} {:>10} {:>10.4}",
                c.color_id, c.reference, c.candidate, c.abs_diff, c.relative_diff
            ));
        }
        report.blank();
    }

    enumeration(&mut report, "FALSE POSITIVES (only in candidate)", seqs.only_in_candidate.iter());
    enumeration(&mut report, "FALSE NEGATIVES (only in reference)", seqs.only_in_reference.iter());

    report.banner();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{compare_abundances, compare_matrices, compare_sets, MatrixCompareOptions};
    use crate::parse::{AbundanceMap, DistanceMatrix};
    use std::collections::BTreeSet;

    fn position(report: &Report, needle: &str) -> usize {
        report
            .lines()
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("missing line containing {:?}", needle))
    }

    #[test]
    fn test_identifier_report_sections_in_order() {
        let reference: BTreeSet<i64> = [1, 2, 3, 4, 10].into_iter().collect();
        let candidate: BTreeSet<i64> = [2, 3, 4, 5, 9].into_iter().collect();
        let report = identifier_report(&compare_sets(&reference, &candidate));

        let basic = position(&report, "BASIC STATISTICS");
        let metrics = position(&report, "PRESENCE/ABSENCE METRICS");
        let fp = position(&report, "FALSE POSITIVES");
        let fn_ = position(&report, "FALSE NEGATIVES");
        assert!(basic < metrics && metrics < fp && fp < fn_);

        // enumerations sorted by identifier
        assert_eq!(report.lines()[fp + 1], "1. 5");
        assert_eq!(report.lines()[fp + 2], "2. 9");
        assert_eq!(report.lines()[fn_ + 1], "1. 1");
        assert_eq!(report.lines()[fn_ + 2], "2. 10");
        assert!(report.text().contains("Precision:  0.6000 (60.00%)"));
    }

    #[test]
    fn test_integer_identifiers_listed_in_numeric_order() {
        let reference: BTreeSet<i64> = [1].into_iter().collect();
        let candidate: BTreeSet<i64> = [1, 10, 2].into_iter().collect();
        let report = identifier_report(&compare_sets(&reference, &candidate));
        let fp = position(&report, "FALSE POSITIVES");
        assert_eq!(report.lines()[fp + 1], "1. 2");
        assert_eq!(report.lines()[fp + 2], "2. 10");
    }

    #[test]
    fn test_identifier_report_is_deterministic() {
        let reference: BTreeSet<i64> = [3, 1, 2].into_iter().collect();
        let candidate: BTreeSet<i64> = [2, 4].into_iter().collect();
        let cmp = compare_sets(&reference, &candidate);
        assert_eq!(identifier_report(&cmp), identifier_report(&cmp));
    }

    #[test]
    fn test_abundance_report_content() {
        let reference: AbundanceMap = [("a", 10), ("b", 20), ("gone", 3)]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        let candidate: AbundanceMap = [("a", 10), ("b", 15)].iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let report = abundance_report(&compare_abundances(&reference, &candidate));
        let text = report.text();

        assert!(text.contains("Identifiers with identical abundance:  1 / 2 (50.00%)"));
        assert!(text.contains("Mean absolute difference:        2.50"));
        assert!(text.contains("Mean relative difference:        12.50%"));
        assert!(text.contains("1. gone (abundance: 3)"));
        assert!(!text.contains("FALSE POSITIVES"));
        assert!(position(&report, "ABUNDANCE ANALYSIS") < position(&report, "FALSE NEGATIVES"));
    }

    #[test]
    fn test_matrix_report_sections() {
        let m = DistanceMatrix::new(
            vec!["x/a".to_string(), "x/b".to_string()],
            vec![vec![0.0, 0.1], vec![0.1, 0.0]],
        )
        .unwrap();
        let cmp = compare_matrices(&m, &m, &MatrixCompareOptions::default()).unwrap();
        let report = matrix_report(&cmp);

        let order = [
            "1. ERROR STATISTICS",
            "2. CORRELATION ANALYSIS",
            "3. BLAND-ALTMAN ANALYSIS",
            "4. WORST CASES",
            "SUMMARY",
        ];
        let positions: Vec<usize> = order.iter().map(|s| position(&report, s)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(report.text().contains("No systematic bias detected"));
        assert!(report.text().contains("Rating: EXCELLENT"));
    }

    #[test]
    fn test_colored_report_lists_colors() {
        use crate::compare::compare_colored;
        use crate::parse::{ColoredParser, ResultParser};
        let parser = ColoredParser::new();
        let reference = parser.parse_str(">h C:4:2\nAC\n").unwrap().into_data();
        let candidate = parser.parse_str(">h C:4:3\nAC\n>h\nGT\n").unwrap().into_data();
        let report = colored_report("q1", &compare_colored(&reference, &candidate));
        let text = report.text();
        assert!(text.contains("COLORED QUERY COMPARISON: q1"));
        assert!(text.contains("Candidate records: 2 (found: 1, not found: 1)"));
        assert!(text.contains("COLOR ABUNDANCE (1 distinct colors, 1 differing)"));
        assert!(text.contains("1. GT"));
    }
}
