//! Agent configuration, loadable from TOML.

use serde::Deserialize;

use crate::inference::OllamaConfig;

/// Top-level configuration for the inspection agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentConfig {
    /// Model tier settings. Absent means patterns only.
    #[serde(default)]
    pub ollama: OllamaConfig,
}

impl AgentConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
