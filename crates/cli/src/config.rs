//! Configuration management for the CLI

use advisor_lib::{Severity, SeverityFilter};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Advisor endpoint URL, used when neither flag nor env var is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Severities hidden from `kadj suggest`
    #[serde(default)]
    pub hidden_severities: BTreeSet<Severity>,
}

impl Config {
    /// Load configuration from file, defaulting when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Resolve the configuration file path
    pub fn path(override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }

        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("kubeadjust").join("config.json"))
    }

    pub fn severity_filter(&self) -> SeverityFilter {
        SeverityFilter::hiding(self.hidden_severities.iter().copied())
    }
}
