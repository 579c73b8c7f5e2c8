//! Scheduler configuration, loadable from TOML.

use serde::Deserialize;

/// Roster and booking defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Technicians in first-fit order.
    #[serde(default = "default_technicians")]
    pub technicians: Vec<String>,
    /// Days ahead of now a parsed request is booked for.
    #[serde(default = "default_lead_days")]
    pub lead_days: i64,
}

fn default_technicians() -> Vec<String> {
    ["John Smith", "Mike Johnson", "Sarah Davis", "Tom Wilson"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_lead_days() -> i64 {
    1
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            technicians: default_technicians(),
            lead_days: default_lead_days(),
        }
    }
}

impl SchedulerConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
