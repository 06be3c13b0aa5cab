use anyhow::{Context, Result};
use clap::Parser;
use idxfidelity::{run, CompareConfig, Settings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compare-abundance")]
#[command(about = "Compare CSV abundance tables (identifier,...,tag,abundance) against the ground truth")]
struct Args {
    /// CSV from the uncompressed index (ground truth)
    reference_file: PathBuf,

    /// CSV from the compressed index
    candidate_file: PathBuf,

    /// Report path (default: comparison_results.txt next to the reference)
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

    let out = run::run_abundance_comparison(&config)
        .with_context(|| format!("Comparison of {} failed", args.candidate_file.display()))?;
    log::info!(
        "{} shared identifiers, {} with identical abundance",
        out.comparison.differences.len(),
        out.comparison.identical_abundance
    );
    log::info!("Results saved to {}", out.report_path.display());
    Ok(())
}
