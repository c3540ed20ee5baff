use crate::scorer::RiskThresholds;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime configuration for the scoring binary. All fields have working
/// defaults so the tool runs with no config file at all; the file only
/// overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the model bundle (JSON: columns, keyword version, weights).
    pub model_path: String,
    /// Optional YAML file overriding the built-in keyword tables.
    pub keyword_file: Option<String>,
    pub thresholds: RiskThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: "/etc/scam-sentinel/model.json".to_string(),
            keyword_file: None,
            thresholds: RiskThresholds::default(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config
            .thresholds
            .validate()
            .with_context(|| format!("invalid thresholds in config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the config at `path` when it exists; otherwise fall back to
    /// defaults. A file that exists but fails to parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::debug!(
                "config file {} not found, using built-in defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn generate_default() -> String {
        r#"# scam-sentinel configuration

# Model bundle produced by the offline training pipeline.
model_path: "/etc/scam-sentinel/model.json"

# Optional keyword-table override. When omitted the built-in tables are
# used. The tables must match the version the model was trained against.
# keyword_file: "/etc/scam-sentinel/keywords.yaml"

# Score cutoffs for the risk bands (closed thresholds, checked from the
# top down).
thresholds:
  high_risk: 70
  suspicious: 40
"#
        .to_string()
    }
}
