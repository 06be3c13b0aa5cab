//! Single-comparison entry points: load both inputs, compare, write the
//! report next to the reference (or where configured), echo it, and write the
//! optional JSON summary.

use crate::compare::{
    compare_abundances, compare_colored, compare_matrices, compare_sets, AbundanceComparison, ColoredComparison,
    MatrixCompareOptions, MatrixComparison, SetComparison,
};
use crate::config::CompareConfig;
use crate::error::Result;
use crate::parse::{AbundanceParser, ColoredParser, IdListParser, MatrixParser, ResultParser};
use crate::report::{self, Report};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default report name for identifier lists
pub fn identifier_report_name(stem: &str) -> String {
    format!("{}_comparisons.txt", stem)
}

/// Default report file for abundance tables, independent of the input name
pub const ABUNDANCE_REPORT_FILE: &str = "comparison_results.txt";

/// Default report name for distance matrices
pub fn matrix_report_name(stem: &str) -> String {
    format!("{}_matrix_comparison.txt", stem)
}

/// Default report name for colored query results
pub fn colored_report_name(stem: &str) -> String {
    format!("{}_colored_comparison.txt", stem)
}

/// Both inputs must exist before anything is parsed
fn check_inputs(reference: &Path, candidate: &Path) -> Result<()> {
    for path in [reference, candidate] {
        if !path.exists() {
            return Err(crate::error::FidelityError::MissingFile(path.to_path_buf()));
        }
    }
    Ok(())
}

pub fn compare_identifier_files(reference: &Path, candidate: &Path) -> Result<SetComparison<i64>> {
    check_inputs(reference, candidate)?;
    let parser = IdListParser;
    let r = parser.parse_file(reference)?.into_data();
    let c = parser.parse_file(candidate)?.into_data();
    Ok(compare_sets(&r, &c))
}

pub fn compare_abundance_files(reference: &Path, candidate: &Path) -> Result<AbundanceComparison> {
    check_inputs(reference, candidate)?;
    let parser = AbundanceParser;
    let r = parser.parse_file(reference)?.into_data();
    let c = parser.parse_file(candidate)?.into_data();
    Ok(compare_abundances(&r, &c))
}

pub fn compare_matrix_files(
    reference: &Path,
    candidate: &Path,
    options: &MatrixCompareOptions,
) -> Result<MatrixComparison> {
    check_inputs(reference, candidate)?;
    let parser = MatrixParser;
    let r = parser.parse_file(reference)?.into_data();
    let c = parser.parse_file(candidate)?.into_data();
    compare_matrices(&r, &c, options)
}

pub fn compare_colored_files(reference: &Path, candidate: &Path) -> Result<ColoredComparison> {
    check_inputs(reference, candidate)?;
    let parser = ColoredParser::new();
    let r = parser.parse_file(reference)?.into_data();
    let c = parser.parse_file(candidate)?.into_data();
    Ok(compare_colored(&r, &c))
}

/// Where a run left its artifacts
#[derive(Debug, Clone)]
pub struct RunOutput<T> {
    pub comparison: T,
    pub report_path: PathBuf,
    pub json_path: Option<PathBuf>,
}

fn publish<T: Serialize>(
    config: &CompareConfig,
    report: Report,
    default_name: impl Fn(&str) -> String,
    comparison: T,
) -> Result<RunOutput<T>> {
    let report_path = config.resolve_output(default_name);
    report.write_to(&report_path)?;
    report.echo();

    let json_path = config.resolve_json(&report_path);
    if let Some(ref path) = json_path {
        report::write_json(path, &comparison)?;
    }
    Ok(RunOutput {
        comparison,
        report_path,
        json_path,
    })
}

pub fn run_identifier_comparison(config: &CompareConfig) -> Result<RunOutput<SetComparison<i64>>> {
    config.validate()?;
    let cmp = compare_identifier_files(&config.reference_path, &config.candidate_path)?;
    let report = report::identifier_report(&cmp);
    publish(config, report, identifier_report_name, cmp)
}

pub fn run_abundance_comparison(config: &CompareConfig) -> Result<RunOutput<AbundanceComparison>> {
    config.validate()?;
    let cmp = compare_abundance_files(&config.reference_path, &config.candidate_path)?;
    let report = report::abundance_report(&cmp);
    publish(config, report, |_| ABUNDANCE_REPORT_FILE.to_string(), cmp)
}

pub fn run_matrix_comparison(config: &CompareConfig) -> Result<RunOutput<MatrixComparison>> {
    config.validate()?;
    let options = MatrixCompareOptions {
        worst_case_count: config.worst_case_count,
        error_thresholds: config.error_thresholds.clone(),
    };
    let cmp = compare_matrix_files(&config.reference_path, &config.candidate_path, &options)?;
    let report = report::matrix_report(&cmp);
    publish(config, report, matrix_report_name, cmp)
}

pub fn run_colored_comparison(config: &CompareConfig) -> Result<RunOutput<ColoredComparison>> {
    config.validate()?;
    let cmp = compare_colored_files(&config.reference_path, &config.candidate_path)?;
    let name = config
        .reference_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("query");
    let report = report::colored_report(name, &cmp);
    publish(config, report, colored_report_name, cmp)
}
