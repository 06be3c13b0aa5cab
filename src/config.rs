use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file
pub const CONFIG_ENV_VAR: &str = "IDXFIDELITY_CONFIG";

/// Settings file looked up in the current directory when no override is set
pub const DEFAULT_CONFIG_FILE: &str = "idxfidelity.toml";

/// Error threshold ladder used for the "fraction under threshold" statistics
pub const DEFAULT_ERROR_THRESHOLDS: [f64; 4] = [0.001, 0.005, 0.01, 0.05];

/// Number of worst label pairs listed in matrix reports
pub const DEFAULT_WORST_CASE_COUNT: usize = 10;

/// Settings loaded from `idxfidelity.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub compare: CompareSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub plot: PlotSettings,
}

/// Comparison tuning
#[derive(Debug, Clone, Deserialize)]
pub struct CompareSettings {
    #[serde(default = "default_worst_case_count")]
    pub worst_case_count: usize,
    #[serde(default = "default_error_thresholds")]
    pub error_thresholds: Vec<f64>,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            worst_case_count: default_worst_case_count(),
            error_thresholds: default_error_thresholds(),
        }
    }
}

fn default_worst_case_count() -> usize {
    DEFAULT_WORST_CASE_COUNT
}

fn default_error_thresholds() -> Vec<f64> {
    DEFAULT_ERROR_THRESHOLDS.to_vec()
}

/// Report output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportSettings {
    /// Always write a JSON summary next to the text report
    #[serde(default)]
    pub write_json: bool,
}

/// Plot canvas size in pixels
#[derive(Debug, Clone, Deserialize)]
pub struct PlotSettings {
    #[serde(default = "default_plot_side")]
    pub width: u32,
    #[serde(default = "default_plot_side")]
    pub height: u32,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: default_plot_side(),
            height: default_plot_side(),
        }
    }
}

fn default_plot_side() -> u32 {
    1000
}

impl Settings {
    /// Load settings from file
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Looks for the settings file in this order:
    /// 1. Path specified in IDXFIDELITY_CONFIG environment variable (must exist)
    /// 2. ./idxfidelity.toml in current directory (optional, defaults otherwise)
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    log::debug!("No {} found, using default settings", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and validate a settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&settings_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        settings.validate()?;
        log::info!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.compare.worst_case_count == 0 {
            anyhow::bail!("compare.worst_case_count must be greater than 0");
        }
        validate_thresholds(&self.compare.error_thresholds)?;
        if self.plot.width == 0 || self.plot.height == 0 {
            anyhow::bail!("plot.width and plot.height must be greater than 0");
        }
        Ok(())
    }
}

/// Thresholds must be non-empty, positive and strictly increasing
pub fn validate_thresholds(thresholds: &[f64]) -> Result<()> {
    if thresholds.is_empty() {
        anyhow::bail!("error_thresholds must not be empty");
    }
    if thresholds.iter().any(|t| !t.is_finite() || *t <= 0.0) {
        anyhow::bail!("error_thresholds must be positive finite numbers");
    }
    if thresholds.windows(2).any(|w| w[0] >= w[1]) {
        anyhow::bail!("error_thresholds must be strictly increasing");
    }
    Ok(())
}

/// Explicit options for one comparison invocation
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub reference_path: PathBuf,
    pub candidate_path: PathBuf,
    /// None means "next to the reference input"
    pub output_path: Option<PathBuf>,
    pub worst_case_count: usize,
    pub error_thresholds: Vec<f64>,
    /// Explicit JSON summary path
    pub json_path: Option<PathBuf>,
    /// Write a JSON summary next to the report when no explicit path is given
    pub write_json: bool,
}

impl CompareConfig {
    /// Build a config for a reference/candidate pair using settings defaults
    pub fn new(reference_path: impl Into<PathBuf>, candidate_path: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            reference_path: reference_path.into(),
            candidate_path: candidate_path.into(),
            output_path: None,
            worst_case_count: settings.compare.worst_case_count,
            error_thresholds: settings.compare.error_thresholds.clone(),
            json_path: None,
            write_json: settings.report.write_json,
        }
    }

    pub fn with_output(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    pub fn with_json(mut self, json_path: Option<PathBuf>) -> Self {
        self.json_path = json_path;
        self
    }

    pub fn with_worst_case_count(mut self, count: Option<usize>) -> Self {
        if let Some(count) = count {
            self.worst_case_count = count;
        }
        self
    }

    pub fn with_thresholds(mut self, thresholds: Option<Vec<f64>>) -> Self {
        if let Some(thresholds) = thresholds {
            self.error_thresholds = thresholds;
        }
        self
    }

    /// Check values that may have come from the command line
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.worst_case_count == 0 {
            return Err(crate::error::FidelityError::Config(
                "worst_case_count must be greater than 0".to_string(),
            ));
        }
        validate_thresholds(&self.error_thresholds)
            .map_err(|e| crate::error::FidelityError::Config(e.to_string()))
    }

    /// Output path, or `default_name(reference_stem)` placed in the reference directory
    pub fn resolve_output(&self, default_name: impl Fn(&str) -> String) -> PathBuf {
        if let Some(ref path) = self.output_path {
            return path.clone();
        }
        let stem = self
            .reference_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("reference");
        let dir = self.reference_path.parent().unwrap_or_else(|| Path::new(""));
        dir.join(default_name(stem))
    }

    /// Where the JSON summary goes for a report written at `report_path`, if anywhere
    pub fn resolve_json(&self, report_path: &Path) -> Option<PathBuf> {
        match self.json_path {
            Some(ref path) => Some(path.clone()),
            None if self.write_json => Some(report_path.with_extension("json")),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.compare.worst_case_count, 10);
        assert_eq!(settings.compare.error_thresholds, vec![0.001, 0.005, 0.01, 0.05]);
        assert!(!settings.report.write_json);
        assert_eq!(settings.plot.width, 1000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("idxfidelity.toml");
        fs::write(
            &path,
            r#"
[compare]
worst_case_count = 25
error_thresholds = [0.01, 0.1]

[report]
write_json = true
"#,
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.compare.worst_case_count, 25);
        assert_eq!(settings.compare.error_thresholds, vec![0.01, 0.1]);
        assert!(settings.report.write_json);
        assert_eq!(settings.plot.height, 1000);
    }

    #[test]
    fn test_settings_rejects_unsorted_thresholds() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[compare]\nerror_thresholds = [0.05, 0.01]\n").unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_settings_rejects_zero_worst_cases() {
        let mut settings = Settings::default();
        settings.compare.worst_case_count = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_missing_file() {
        let result = Settings::from_file(Path::new("does/not/exist.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_compare_config_overrides() {
        let settings = Settings::default();
        let config = CompareConfig::new("a.tsv", "b.tsv", &settings)
            .with_worst_case_count(Some(3))
            .with_thresholds(None);
        assert_eq!(config.worst_case_count, 3);
        assert_eq!(config.error_thresholds.len(), 4);
        assert!(config.validate().is_ok());

        let bad = config.with_thresholds(Some(vec![]));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_resolve_output_defaults_next_to_reference() {
        let settings = Settings::default();
        let config = CompareConfig::new("runs/orig/q1_result.txt", "runs/comp/q1_result.txt", &settings);
        let out = config.resolve_output(|stem| format!("{}_comparisons.txt", stem));
        assert_eq!(out, PathBuf::from("runs/orig/q1_result_comparisons.txt"));

        let explicit = config.with_output(Some(PathBuf::from("out.txt")));
        assert_eq!(explicit.resolve_output(|_| "ignored".to_string()), PathBuf::from("out.txt"));
    }

    #[test]
    fn test_resolve_json() {
        let mut settings = Settings::default();
        let config = CompareConfig::new("a.tsv", "b.tsv", &settings);
        assert_eq!(config.resolve_json(Path::new("out/report.txt")), None);

        settings.report.write_json = true;
        let config = CompareConfig::new("a.tsv", "b.tsv", &settings);
        assert_eq!(
            config.resolve_json(Path::new("out/report.txt")),
            Some(PathBuf::from("out/report.json"))
        );

        let explicit = config.with_json(Some(PathBuf::from("x.json")));
        assert_eq!(explicit.resolve_json(Path::new("r.txt")), Some(PathBuf::from("x.json")));
    }
}
