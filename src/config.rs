//! Configuration for the screener.

use crate::features::PipelineMode;
use crate::table::ApplicationTable;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// How the scoring path is chosen for an upload.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
    /// Detect from the uploaded schema: full pipeline when every required
    /// column is present, raw passthrough otherwise.
    #[default]
    Auto,
    /// Always run feature engineering. Missing required columns are a hard
    /// error, never a silent fallback to raw mode.
    Full,
    /// Always pass the table straight to the classifier.
    Raw,
}

impl ModeSetting {
    /// Resolve the setting against an uploaded table.
    pub fn resolve(&self, table: &ApplicationTable) -> PipelineMode {
        match self {
            ModeSetting::Auto => PipelineMode::detect(table),
            ModeSetting::Full => PipelineMode::Full,
            ModeSetting::Raw => PipelineMode::Raw,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

/// Pre-trained artifact locations
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Path to the trained classifier (ONNX)
    pub model_path: String,
    /// Path to the category-encoder artifact (JSON class lists)
    pub encoders_path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Scoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Pipeline mode: "auto", "full", or "raw"
    #[serde(default)]
    pub mode: ModeSetting,
    /// Fraud probability at or above which a row is labelled FRAUD
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load the default config file if present, defaults otherwise. A
    /// malformed file is still an error.
    pub fn load_or_default() -> Result<Self> {
        if Path::new("config/config.toml").exists() {
            Self::load()
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactsConfig {
                model_path: "artifacts/fraud_model.onnx".to_string(),
                encoders_path: "artifacts/label_encoders.json".to_string(),
                onnx_threads: 1,
            },
            scoring: ScoringConfig {
                mode: ModeSetting::Auto,
                threshold: 0.5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.artifacts.model_path, "artifacts/fraud_model.onnx");
        assert_eq!(config.scoring.mode, ModeSetting::Auto);
        assert_eq!(config.scoring.threshold, 0.5);
        assert_eq!(config.artifacts.onnx_threads, 1);
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[artifacts]
model_path = "m.onnx"
encoders_path = "e.json"

[scoring]
mode = "raw"
threshold = 0.61

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.artifacts.model_path, "m.onnx");
        assert_eq!(config.scoring.mode, ModeSetting::Raw);
        assert_eq!(config.scoring.threshold, 0.61);
        assert_eq!(config.logging.level, "debug");
        // Defaulted field
        assert_eq!(config.artifacts.onnx_threads, 1);
    }

    #[test]
    fn test_mode_resolution() {
        let raw_table = ApplicationTable::from_reader("f0,f1\n1,2\n".as_bytes()).unwrap();
        assert_eq!(ModeSetting::Auto.resolve(&raw_table), PipelineMode::Raw);
        assert_eq!(ModeSetting::Full.resolve(&raw_table), PipelineMode::Full);
        assert_eq!(ModeSetting::Raw.resolve(&raw_table), PipelineMode::Raw);
    }
}
