//! Advisor configuration

use anyhow::{Context, Result};
use serde::Deserialize;

/// Advisor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    /// Instance name reported in logs and health documents
    #[serde(default = "default_node_name")]
    pub node_name: String,

    /// Interface the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port for suggestions, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_node_name() -> String {
    std::env::var("NODE_NAME").unwrap_or_else(|_| "unknown".to_string())
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            node_name: default_node_name(),
            bind_address: default_bind_address(),
            api_port: default_api_port(),
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from `ADVISOR_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix("ADVISOR"))
    }

    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()
            .context("failed to read advisor configuration")?
            .try_deserialize()
            .context("invalid advisor configuration")
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.api_port)
    }
}
