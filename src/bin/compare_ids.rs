use anyhow::{Context, Result};
use clap::Parser;
use idxfidelity::{run, CompareConfig, Settings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compare-ids")]
#[command(about = "Compare identifier lists returned by a compressed index against the uncompressed ground truth")]
struct Args {
    /// Result file from the uncompressed index (ground truth)
    reference_file: PathBuf,

    /// Result file from the compressed index
    candidate_file: PathBuf,

    /// Report path (default: <reference_dir>/<reference_stem>_comparisons.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a JSON summary here
    #[arg(long)]
    json: Option<PathBuf>,
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
        .with_json(args.json);

    let out = run::run_identifier_comparison(&config)
        .with_context(|| format!("Comparison of {} failed", args.candidate_file.display()))?;
    log::info!("Results saved to {}", out.report_path.display());
    Ok(())
}
