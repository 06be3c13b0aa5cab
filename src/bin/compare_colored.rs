use anyhow::{Context, Result};
use clap::Parser;
use idxfidelity::{run, CompareConfig, Settings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compare-colored")]
#[command(about = "Compare colored-sequence query output of a compressed graph index against the ground truth")]
struct Args {
    /// Query output from the uncompressed index (ground truth)
    reference_file: PathBuf,

    /// Query output from the compressed index
    candidate_file: PathBuf,

    /// Report path (default: <reference_dir>/<reference_stem>_colored_comparison.txt)
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

    let out = run::run_colored_comparison(&config)
        .with_context(|| format!("Comparison of {} failed", args.candidate_file.display()))?;
    log::info!(
        "{} distinct colors, {} with differing counts",
        out.comparison.colors.len(),
        out.comparison.differing_colors()
    );
    log::info!("Results saved to {}", out.report_path.display());
    Ok(())
}
