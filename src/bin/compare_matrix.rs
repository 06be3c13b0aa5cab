use anyhow::{Context, Result};
use clap::Parser;
use idxfidelity::{plot, run, CompareConfig, Settings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compare-matrix")]
#[command(about = "Compare distance tables from the original and compressed sketch indexes")]
struct Args {
    /// Distance table from the original index (ground truth)
    reference_file: PathBuf,

    /// Distance table from the compressed index
    candidate_file: PathBuf,

    /// Report path (default: <reference_dir>/<reference_stem>_matrix_comparison.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a JSON summary here
    #[arg(long)]
    json: Option<PathBuf>,

    /// Number of worst label pairs to list
    #[arg(long)]
    top: Option<usize>,

    /// Comma-separated error thresholds, e.g. 0.001,0.01,0.05
    #[arg(long, value_delimiter = ',')]
    thresholds: Option<Vec<f64>>,

    /// Write correlation and Bland-Altman SVG plots into this directory
    #[arg(long)]
    plots: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let settings = Settings::load()?;

    let config = CompareConfig::new(&args.reference_file, &args.candidate_file, &settings)
        .with_output(args.output)
        .with_json(args.json)
        .with_worst_case_count(args.top)
        .with_thresholds(args.thresholds);

    let out = run::run_matrix_comparison(&config)
        .with_context(|| format!("Comparison of {} failed", args.candidate_file.display()))?;
    log::info!("Results saved to {}", out.report_path.display());

    if let Some(dir) = args.plots {
        let paths = plot::write_plots(&out.comparison, &dir, &settings.plot)
            .with_context(|| format!("Failed to render plots into {}", dir.display()))?;
        for path in paths {
            log::info!("Plot saved to {}", path.display());
        }
    }
    Ok(())
}
