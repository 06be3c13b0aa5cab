pub mod idlist;
pub mod colored;
pub mod abundance;
pub mod matrix;

use crate::error::{FidelityError, Result};
use serde::Serialize;
use std::path::Path;

pub use abundance::{AbundanceMap, AbundanceParser, AbundanceRecord};
pub use colored::{ColorAbundanceMap, ColorTag, ColoredParser, ColoredQueryResult, ColoredSequenceRecord};
pub use idlist::{IdListParser, IdentifierSet};
pub use matrix::{DistanceMatrix, MatrixParser};

/// A line that could not be interpreted and was skipped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineWarning {
    /// 1-based line (or record) number in the input
    pub line: usize,
    pub message: String,
}

/// Canonical dataset plus the recoverable problems met while building it
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub data: T,
    pub warnings: Vec<LineWarning>,
}

impl<T> Parsed<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    /// Record a skipped line and log it
    pub fn warn(&mut self, line: usize, message: impl Into<String>) {
        let message = message.into();
        log::warn!("Skipping line {}: {}", line, message);
        self.warnings.push(LineWarning { line, message });
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Trait for result-file parsers
pub trait ResultParser {
    /// Canonical dataset produced by this parser
    type Output;

    /// Short format name used in logs and reports
    fn format_name(&self) -> &'static str;

    /// Parse in-memory file content
    fn parse_str(&self, content: &str) -> Result<Parsed<Self::Output>>;

    /// Parse a file; a missing file is fatal
    fn parse_file(&self, path: &Path) -> Result<Parsed<Self::Output>> {
        if !path.exists() {
            return Err(FidelityError::MissingFile(path.to_path_buf()));
        }
        log::info!("Loading {} file {}", self.format_name(), path.display());
        let content = std::fs::read_to_string(path)?;
        let parsed = self.parse_str(&content)?;
        if !parsed.warnings.is_empty() {
            log::warn!(
                "{}: {} line(s) skipped while parsing",
                path.display(),
                parsed.warnings.len()
            );
        }
        Ok(parsed)
    }
}
