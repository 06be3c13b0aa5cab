//! Batch driver: pair result files found under two directories and compare
//! each pair, collecting the outcomes into a [`BatchSummary`].

use crate::compare::MatrixCompareOptions;
use crate::error::{FidelityError, Result};
use crate::pipeline;
use crate::report::summary::{BatchEntry, BatchSummary, PresenceFigures};
use crate::run;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

pub const DEFAULT_SUFFIX: &str = "_result.txt";
pub const DEFAULT_SUBDIR: &str = "query_results";

/// Kind of result file being paired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFormat {
    Colored,
    Ids,
    Abundance,
    Matrix,
}

impl FromStr for ResultFormat {
    type Err = FidelityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "colored" => Ok(Self::Colored),
            "ids" => Ok(Self::Ids),
            "abundance" => Ok(Self::Abundance),
            "matrix" => Ok(Self::Matrix),
            other => Err(FidelityError::Config(format!(
                "Unknown result format '{}' (expected colored, ids, abundance or matrix)",
                other
            ))),
        }
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Colored => "colored",
            Self::Ids => "ids",
            Self::Abundance => "abundance",
            Self::Matrix => "matrix",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub reference_dir: PathBuf,
    pub candidate_dir: PathBuf,
    pub format: ResultFormat,
    pub suffix: String,
    /// Looked up inside each directory; the directory itself is used when absent
    pub subdir: Option<String>,
    pub out_dir: PathBuf,
    pub pre_steps: Vec<String>,
    pub matrix: MatrixCompareOptions,
}

impl BatchOptions {
    pub fn new(reference_dir: impl Into<PathBuf>, candidate_dir: impl Into<PathBuf>, format: ResultFormat) -> Self {
        Self {
            reference_dir: reference_dir.into(),
            candidate_dir: candidate_dir.into(),
            format,
            suffix: DEFAULT_SUFFIX.to_string(),
            subdir: Some(DEFAULT_SUBDIR.to_string()),
            out_dir: PathBuf::from("."),
            pre_steps: Vec::new(),
            matrix: MatrixCompareOptions::default(),
        }
    }
}

/// Directory the result files live in
fn results_root(dir: &Path, subdir: Option<&str>) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(FidelityError::MissingFile(dir.to_path_buf()));
    }
    match subdir.filter(|s| !s.is_empty()) {
        Some(sub) if dir.join(sub).is_dir() => Ok(dir.join(sub)),
        Some(sub) => {
            log::info!("No {} directory in {}, searching it directly", sub, dir.display());
            Ok(dir.to_path_buf())
        }
        None => Ok(dir.to_path_buf()),
    }
}

/// Relative paths of files under `root` whose name ends with `suffix`, sorted
pub fn discover_results(root: &Path, suffix: &str) -> Result<BTreeSet<PathBuf>> {
    let mut found = BTreeSet::new();
    for entry in WalkDir::new(root).follow_links(true).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(suffix));
        if !matches {
            continue;
        }
        let relative = path.strip_prefix(root).map_err(|_| {
            FidelityError::Config(format!("Failed to compute relative path for: {}", path.display()))
        })?;
        found.insert(relative.to_path_buf());
    }
    log::info!("Discovered {} result files in {}", found.len(), root.display());
    Ok(found)
}

/// Compare one reference/candidate pair
pub fn compare_pair(name: &str, reference: &Path, candidate: &Path, options: &BatchOptions) -> Result<BatchEntry> {
    let (presence, quality_score, details) = match options.format {
        ResultFormat::Ids => {
            let cmp = run::compare_identifier_files(reference, candidate)?;
            (Some(PresenceFigures::from(&cmp)), None, serde_json::to_value(&cmp)?)
        }
        ResultFormat::Abundance => {
            let cmp = run::compare_abundance_files(reference, candidate)?;
            (Some(PresenceFigures::from(&cmp.presence)), None, serde_json::to_value(&cmp)?)
        }
        ResultFormat::Colored => {
            let cmp = run::compare_colored_files(reference, candidate)?;
            (Some(PresenceFigures::from(&cmp.sequences)), None, serde_json::to_value(&cmp)?)
        }
        ResultFormat::Matrix => {
            let cmp = run::compare_matrix_files(reference, candidate, &options.matrix)?;
            (None, Some(cmp.quality_score), serde_json::to_value(&cmp)?)
        }
    };
    Ok(BatchEntry {
        name: name.to_string(),
        reference_path: reference.to_path_buf(),
        candidate_path: candidate.to_path_buf(),
        presence,
        quality_score,
        details,
    })
}

/// Run pre-steps, compare every pair and write the summary files
pub fn run_batch(options: &BatchOptions) -> Result<BatchSummary> {
    let mut summary = BatchSummary::new(&options.format.to_string());
    summary.steps = pipeline::run_steps(&options.pre_steps, Path::new("."));

    let subdir = options.subdir.as_deref();
    let reference_root = results_root(&options.reference_dir, subdir)?;
    let candidate_root = results_root(&options.candidate_dir, subdir)?;
    let reference_files = discover_results(&reference_root, &options.suffix)?;
    let candidate_files = discover_results(&candidate_root, &options.suffix)?;

    for relative in &reference_files {
        let name = relative.to_string_lossy().to_string();
        if !candidate_files.contains(relative) {
            summary.skip(name, "no counterpart in candidate directory");
            continue;
        }
        let reference = reference_root.join(relative);
        let candidate = candidate_root.join(relative);
        match compare_pair(&name, &reference, &candidate, options) {
            Ok(entry) => {
                log::info!("Compared {}", name);
                summary.push(entry);
            }
            Err(e) => summary.skip(name, e.to_string()),
        }
    }

    for relative in candidate_files.difference(&reference_files) {
        summary.skip(relative.to_string_lossy(), "no counterpart in reference directory");
    }

    summary.write(&options.out_dir)?;
    Ok(summary)
}
