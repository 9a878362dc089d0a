//! Simulator intervals and initial agent settings.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MonitorError, MonitorResult};
use crate::pipeline::Pipeline;
use crate::settings::{default_panels, AgentSettings, SettingValue};

/// Monitor section of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Gauge update period
    pub metrics_interval_ms: u64,
    /// Pipeline progress update period
    pub pipeline_interval_ms: u64,
    /// Demo playback tick period
    pub demo_interval_ms: u64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
    /// Initial agent settings, keyed by agent id then setting key
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub agents: BTreeMap<String, BTreeMap<String, SettingValue>>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            metrics_interval_ms: 3000,
            pipeline_interval_ms: 2000,
            demo_interval_ms: 100,
            seed: None,
            agents: BTreeMap::new(),
        }
    }
}

impl MonitorConfig {
    /// Reject zero intervals and agent settings that don't fit their panel
    pub fn validate(&self) -> MonitorResult<()> {
        for (name, value) in [
            ("metrics_interval_ms", self.metrics_interval_ms),
            ("pipeline_interval_ms", self.pipeline_interval_ms),
            ("demo_interval_ms", self.demo_interval_ms),
        ] {
            if value == 0 {
                return Err(MonitorError::ZeroInterval(name.to_string()));
            }
        }
        self.agent_settings().map(|_| ())
    }

    /// Panels for every pipeline agent with the configured values applied
    pub fn agent_settings(&self) -> MonitorResult<BTreeMap<String, AgentSettings>> {
        let mut panels = default_panels(&Pipeline::default());
        for (agent_id, values) in &self.agents {
            panels
                .get_mut(agent_id)
                .ok_or_else(|| MonitorError::UnknownAgent(agent_id.clone()))?
                .apply(values)?;
        }
        Ok(panels)
    }

    /// Apply `PILOT_METRICS_INTERVAL_MS` and `PILOT_SEED`
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(interval) = lookup("PILOT_METRICS_INTERVAL_MS") {
            match interval.parse::<u64>() {
                Ok(value) => self.metrics_interval_ms = value,
                Err(_) => warn!("Ignoring invalid PILOT_METRICS_INTERVAL_MS: {}", interval),
            }
        }
        if let Some(seed) = lookup("PILOT_SEED") {
            match seed.parse::<u64>() {
                Ok(value) => self.seed = Some(value),
                Err(_) => warn!("Ignoring invalid PILOT_SEED: {}", seed),
            }
        }
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    pub fn pipeline_interval(&self) -> Duration {
        Duration::from_millis(self.pipeline_interval_ms)
    }

    pub fn demo_interval(&self) -> Duration {
        Duration::from_millis(self.demo_interval_ms)
    }
}
