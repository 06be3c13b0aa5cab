use anyhow::{Context, Result};
use clap::Parser;
use idxfidelity::batch::{self, BatchOptions, ResultFormat, DEFAULT_SUBDIR, DEFAULT_SUFFIX};
use idxfidelity::compare::MatrixCompareOptions;
use idxfidelity::Settings;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compare-batch")]
#[command(about = "Pair result files from two index runs and compare every pair")]
struct Args {
    /// Run directory of the uncompressed index (ground truth)
    reference_dir: PathBuf,

    /// Run directory of the compressed index
    candidate_dir: PathBuf,

    /// Result format: colored, ids, abundance or matrix
    #[arg(long, default_value = "colored")]
    format: ResultFormat,

    /// File name suffix of result files
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// Sub-directory holding the result files (ignored when absent)
    #[arg(long, default_value = DEFAULT_SUBDIR)]
    subdir: String,

    /// Where analysis_summary.txt and query_analysis_results.json are written
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Shell command to run before comparing; repeatable, failures are reported
    #[arg(long = "pre-step")]
    pre_steps: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let settings = Settings::load()?;

    let options = BatchOptions {
        reference_dir: args.reference_dir,
        candidate_dir: args.candidate_dir,
        format: args.format,
        suffix: args.suffix,
        subdir: Some(args.subdir),
        out_dir: args.out_dir,
        pre_steps: args.pre_steps,
        matrix: MatrixCompareOptions {
            worst_case_count: settings.compare.worst_case_count,
            error_thresholds: settings.compare.error_thresholds.clone(),
        },
    };

    let summary = batch::run_batch(&options).context("Batch comparison failed")?;

    for entry in &summary.entries {
        match (&entry.presence, entry.quality_score) {
            (Some(p), _) => println!(
                "{}: TP={} FP={} FN={} precision={:.4} recall={:.4} F1={:.4}",
                entry.name, p.true_positives, p.false_positives, p.false_negatives, p.precision, p.recall, p.f1_score
            ),
            (None, Some(q)) => println!("{}: quality score {:.3}", entry.name, q),
            (None, None) => println!("{}", entry.name),
        }
    }
    println!();
    summary.to_report().echo();

    if summary.entries.is_empty() {
        log::warn!("No pairs were compared");
    }
    Ok(())
}
