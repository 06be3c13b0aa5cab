use std::path::PathBuf;
use thiserror::Error;

/// Main error type for idxfidelity
#[derive(Error, Debug)]
pub enum FidelityError {
    /// A required input file does not exist
    #[error("Input file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Whole-input parse failures (line-level problems are warnings, not errors)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Matrices or label sets that should align do not
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON summary serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Plot rendering errors
    #[error("Plot error: {0}")]
    Plot(String),
}

/// Convenient Result type using FidelityError
pub type Result<T> = std::result::Result<T, FidelityError>;
