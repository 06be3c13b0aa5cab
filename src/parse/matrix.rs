//! Labeled distance tables (Mash-style): optional `#` comment header, then
//! `<label>\t<float>\t<float>...` rows forming a square matrix.

use super::{Parsed, ResultParser};
use crate::error::{FidelityError, Result};
use serde::Serialize;

/// Tolerance used when checking symmetry of parsed tables
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Square pairwise distance matrix with ordered labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Build a matrix, failing unless `values` is `labels.len()` × `labels.len()`
    pub fn new(labels: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self> {
        let n = labels.len();
        if values.len() != n {
            return Err(FidelityError::ShapeMismatch(format!(
                "{} labels but {} rows",
                n,
                values.len()
            )));
        }
        if let Some((i, row)) = values.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(FidelityError::ShapeMismatch(format!(
                "row {} ({}) has {} columns, expected {}",
                i + 1,
                labels[i],
                row.len(),
                n
            )));
        }
        Ok(Self { labels, values })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Cells (i, j) with i < j in row-major order
    pub fn upper_triangle(&self) -> Vec<f64> {
        let n = self.len();
        let mut flat = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                flat.push(self.values[i][j]);
            }
        }
        flat
    }

    /// Index pairs (i, j), i < j, in the same order as `upper_triangle`
    pub fn upper_pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.len();
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
    }

    /// Pairs whose mirrored cells differ
    pub fn asymmetric_pairs(&self) -> Vec<(usize, usize)> {
        self.upper_pairs()
            .filter(|&(i, j)| (self.values[i][j] - self.values[j][i]).abs() > SYMMETRY_TOLERANCE)
            .collect()
    }

    /// Serialize back to the tab-separated table format
    pub fn to_tsv(&self) -> String {
        let mut out = String::from("#query");
        for label in &self.labels {
            out.push('\t');
            out.push_str(label);
        }
        out.push('\n');
        for (label, row) in self.labels.iter().zip(&self.values) {
            out.push_str(label);
            for v in row {
                out.push('\t');
                out.push_str(&v.to_string());
            }
            out.push('\n');
        }
        out
    }
}

/// Parser for tab-separated distance tables
pub struct MatrixParser;

impl ResultParser for MatrixParser {
    type Output = DistanceMatrix;

    fn format_name(&self) -> &'static str {
        "distance table"
    }

    fn parse_str(&self, content: &str) -> Result<Parsed<DistanceMatrix>> {
        let mut labels = Vec::new();
        let mut rows = Vec::new();
        let mut warnings = Parsed::new(());

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim_end();
            if line.trim_start().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let label = fields.next().unwrap_or_default().to_string();
            let row: std::result::Result<Vec<f64>, String> = fields
                .map(|f| match f.trim().parse::<f64>() {
                    Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
                    Ok(_) => Err(format!("{}: distance {:?} is not a finite non-negative number", label, f)),
                    Err(_) => Err(format!("{}: non-numeric distance {:?}", label, f)),
                })
                .collect();
            match row {
                Ok(row) => {
                    labels.push(label);
                    rows.push(row);
                }
                Err(msg) => warnings.warn(idx + 1, msg),
            }
        }

        if labels.is_empty() {
            return Err(FidelityError::Parse("distance table has no data rows".to_string()));
        }

        let matrix = DistanceMatrix::new(labels, rows)?;
        let asymmetric = matrix.asymmetric_pairs();
        for &(i, j) in asymmetric.iter().take(5) {
            log::warn!(
                "Asymmetric distance between {} and {}: {} vs {}",
                matrix.labels[i],
                matrix.labels[j],
                matrix.get(i, j),
                matrix.get(j, i)
            );
        }
        if asymmetric.len() > 5 {
            log::warn!("{} asymmetric pairs in total", asymmetric.len());
        }

        log::info!("Found {} genomes, matrix shape {}x{}", matrix.len(), matrix.len(), matrix.len());
        Ok(Parsed {
            data: matrix,
            warnings: warnings.warnings,
        })
    }
}
