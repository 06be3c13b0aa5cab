//! Report assembly: deterministic text reports, console echo and lossless
//! JSON summaries.

pub mod render;
pub mod summary;

use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use render::{abundance_report, colored_report, identifier_report, matrix_report};
pub use summary::{BatchEntry, BatchSummary, SkippedPair};

/// Width of the `=` banners framing each report
pub const BANNER_WIDTH: usize = 70;

/// Ordered lines of a text report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn banner(&mut self) {
        self.lines.push("=".repeat(BANNER_WIDTH));
    }

    /// Title framed by banners
    pub fn heading(&mut self, title: &str) {
        self.banner();
        self.line(title);
        self.banner();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Write the report verbatim, creating parent directories as needed
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.text())?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }

    /// Print the report to stdout
    pub fn echo(&self) {
        print!("{}", self.text());
    }
}

/// Serialize a comparison as pretty JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    log::info!("JSON summary written to {}", path.display());
    Ok(())
}
