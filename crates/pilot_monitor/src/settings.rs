//! Per-agent configuration panels.
//!
//! Each pipeline agent exposes a fixed list of settings (select, slider or
//! toggle). Agents without a dedicated panel get an empty one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, MonitorResult};
use crate::pipeline::Pipeline;

/// Shape and bounds of a setting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SettingKind {
    /// One of a fixed set of options (stored as lowercase, dash-separated ids)
    Select { options: Vec<String> },
    /// Number in `[min, max]` on a `step` grid starting at `min`
    Slider { min: f64, max: f64, step: f64 },
    Toggle,
}

/// Current value of a setting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(f64),
    Choice(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(true) => f.write_str("enabled"),
            Self::Flag(false) => f.write_str("disabled"),
            Self::Number(n) => write!(f, "{}", n),
            Self::Choice(c) => f.write_str(c),
        }
    }
}

/// A single setting in an agent panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingSpec {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: SettingKind,
    pub default: SettingValue,
}

impl SettingSpec {
    fn select(key: &str, label: &str, options: &[&str]) -> Self {
        let options: Vec<String> = options.iter().map(|o| option_id(o)).collect();
        let default = SettingValue::Choice(options.first().cloned().unwrap_or_default());
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: SettingKind::Select { options },
            default,
        }
    }

    fn slider(key: &str, label: &str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: SettingKind::Slider { min, max, step },
            default: SettingValue::Number(default),
        }
    }

    fn toggle(key: &str, label: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: SettingKind::Toggle,
            default: SettingValue::Flag(default),
        }
    }

    /// Check that `value` fits this setting
    pub fn validate(&self, value: &SettingValue) -> MonitorResult<()> {
        let invalid = |reason: String| MonitorError::InvalidSetting {
            key: self.key.clone(),
            value: value.to_string(),
            reason,
        };
        match (&self.kind, value) {
            (SettingKind::Toggle, SettingValue::Flag(_)) => Ok(()),
            (SettingKind::Select { options }, SettingValue::Choice(choice)) => {
                if options.contains(choice) {
                    Ok(())
                } else {
                    Err(invalid(format!("expected one of {}", options.join(", "))))
                }
            }
            (SettingKind::Slider { min, max, step }, SettingValue::Number(n)) => {
                if !n.is_finite() || *n < *min || *n > *max {
                    return Err(invalid(format!("must be between {} and {}", min, max)));
                }
                let steps = (n - min) / step;
                if (steps - steps.round()).abs() > 1e-6 {
                    return Err(invalid(format!("must be a multiple of {} from {}", step, min)));
                }
                Ok(())
            }
            (kind, _) => Err(invalid(format!("wrong type for a {} setting", kind_name(kind)))),
        }
    }

    /// Parse a command-line value for this setting
    pub fn parse(&self, raw: &str) -> MonitorResult<SettingValue> {
        let raw = raw.trim();
        let value = match &self.kind {
            SettingKind::Toggle => match raw.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "enabled" => SettingValue::Flag(true),
                "false" | "off" | "no" | "disabled" => SettingValue::Flag(false),
                _ => SettingValue::Choice(raw.to_string()),
            },
            SettingKind::Slider { .. } => match raw.parse::<f64>() {
                Ok(n) => SettingValue::Number(n),
                Err(_) => SettingValue::Choice(raw.to_string()),
            },
            SettingKind::Select { .. } => SettingValue::Choice(option_id(raw)),
        };
        self.validate(&value)?;
        Ok(value)
    }
}

fn kind_name(kind: &SettingKind) -> &'static str {
    match kind {
        SettingKind::Select { .. } => "select",
        SettingKind::Slider { .. } => "slider",
        SettingKind::Toggle => "toggle",
    }
}

/// "Fill Mean" -> "fill-mean"
fn option_id(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "-")
}

/// Configuration panel of one pipeline agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSettings {
    #[serde(rename = "agentId")]
    pub agent_id: String,
    pub title: String,
    pub description: String,
    pub specs: Vec<SettingSpec>,
    pub values: BTreeMap<String, SettingValue>,
}

impl AgentSettings {
    /// Panel for an agent id, with every setting at its default
    pub fn for_agent(agent_id: &str) -> Self {
        let (title, description, specs) = match agent_id {
            "data-ingestion" => (
                "Data Ingestion Agent",
                "Configure data sources and ingestion parameters",
                vec![
                    SettingSpec::select(
                        "source-type",
                        "Source Type",
                        &["Database", "API", "File Upload", "Stream"],
                    ),
                    SettingSpec::slider("batch-size", "Batch Size", 10.0, 1000.0, 1.0, 32.0),
                    SettingSpec::toggle("validation", "Data Validation", true),
                ],
            ),
            "data-cleaning" => (
                "Data Cleaning Agent",
                "Set data quality and cleaning parameters",
                vec![
                    SettingSpec::slider(
                        "outlier-threshold",
                        "Outlier Threshold",
                        0.0,
                        100.0,
                        1.0,
                        75.0,
                    ),
                    SettingSpec::select(
                        "missing-data",
                        "Handle Missing Data",
                        &["Drop", "Interpolate", "Fill Mean"],
                    ),
                    SettingSpec::toggle("automated", "Automated Cleaning", true),
                ],
            ),
            "model-training" => (
                "Model Training Agent",
                "Configure training algorithms and parameters",
                vec![
                    SettingSpec::select(
                        "algorithm",
                        "Algorithm",
                        &["Neural Network", "Random Forest", "SVM", "XGBoost"],
                    ),
                    SettingSpec::slider("epochs", "Training Epochs", 10.0, 500.0, 1.0, 100.0),
                    SettingSpec::slider("learning-rate", "Learning Rate", 0.001, 0.1, 0.001, 0.01),
                ],
            ),
            _ => ("Agent Configuration", "Configure agent parameters", Vec::new()),
        };

        let values = specs
            .iter()
            .map(|s| (s.key.clone(), s.default.clone()))
            .collect();
        Self {
            agent_id: agent_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            specs,
            values,
        }
    }

    pub fn spec(&self, key: &str) -> Option<&SettingSpec> {
        self.specs.iter().find(|s| s.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Set a value after checking it against the setting's bounds
    pub fn set(&mut self, key: &str, value: SettingValue) -> MonitorResult<()> {
        let spec = self.spec(key).ok_or_else(|| MonitorError::UnknownSetting {
            agent: self.agent_id.clone(),
            key: key.to_string(),
        })?;
        spec.validate(&value)?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Parse and set a command-line value
    pub fn set_raw(&mut self, key: &str, raw: &str) -> MonitorResult<()> {
        let spec = self.spec(key).ok_or_else(|| MonitorError::UnknownSetting {
            agent: self.agent_id.clone(),
            key: key.to_string(),
        })?;
        let value = spec.parse(raw)?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Apply several values; nothing changes if any of them is invalid
    pub fn apply(&mut self, values: &BTreeMap<String, SettingValue>) -> MonitorResult<()> {
        let mut next = self.clone();
        for (key, value) in values {
            next.set(key, value.clone())?;
        }
        *self = next;
        Ok(())
    }

    /// Restore every default
    pub fn reset(&mut self) {
        *self = Self::for_agent(&self.agent_id);
    }
}

/// Default panels for every agent of a pipeline, keyed by agent id
pub fn default_panels(pipeline: &Pipeline) -> BTreeMap<String, AgentSettings> {
    pipeline
        .agents
        .iter()
        .map(|a| (a.id.clone(), AgentSettings::for_agent(&a.id)))
        .collect()
}
