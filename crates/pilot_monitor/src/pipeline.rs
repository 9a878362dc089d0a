//! Pipeline agents, projects and alerts shown on the dashboard.
//!
//! Progress here is simulated: running agents creep toward 100 on every
//! tick, everything else is static seed data.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// State of a pipeline agent or project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Hasn't started yet
    #[default]
    Idle,
    /// Currently processing
    Running,
    /// Finished successfully
    Completed,
    /// Failed
    Error,
}

/// Position of an agent in the pipeline graph
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// A stage of the main pipeline
    Primary,
    /// Coordinates the other agents
    Orchestrator,
}

/// An agent in the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineAgent {
    /// Agent identifier
    pub id: String,
    /// Display name
    pub name: String,
    pub status: AgentStatus,
    /// Progress percentage (0-100)
    pub progress: f64,
    pub role: AgentRole,
}

impl PipelineAgent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: AgentRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: AgentStatus::Idle,
            progress: 0.0,
            role,
        }
    }

    /// Set status and progress
    pub fn with_state(mut self, status: AgentStatus, progress: f64) -> Self {
        self.status = status;
        self.progress = progress.clamp(0.0, 100.0);
        self
    }

    /// Next state: running agents below 100 advance by up to 5 points
    pub fn advance<R: Rng>(&self, rng: &mut R) -> Self {
        if self.status != AgentStatus::Running || self.progress >= 100.0 {
            return self.clone();
        }
        let r: f64 = rng.gen();
        Self {
            progress: (self.progress + r * 5.0).min(100.0),
            ..self.clone()
        }
    }
}

/// The simulated data pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pipeline {
    pub agents: Vec<PipelineAgent>,
}

impl Pipeline {
    /// Advance every running agent
    pub fn advance<R: Rng>(&self, rng: &mut R) -> Self {
        Self {
            agents: self.agents.iter().map(|a| a.advance(rng)).collect(),
        }
    }

    pub fn agent(&self, id: &str) -> Option<&PipelineAgent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Mean progress of the primary stages (0-100)
    pub fn overall_progress(&self) -> u8 {
        let primary: Vec<_> = self
            .agents
            .iter()
            .filter(|a| a.role == AgentRole::Primary)
            .collect();
        if primary.is_empty() {
            return 100;
        }
        let total: f64 = primary.iter().map(|a| a.progress).sum();
        (total / primary.len() as f64).round() as u8
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            agents: vec![
                PipelineAgent::new("data-ingestion", "Data Ingestion", AgentRole::Primary)
                    .with_state(AgentStatus::Completed, 100.0),
                PipelineAgent::new("data-cleaning", "Data Cleaning", AgentRole::Primary)
                    .with_state(AgentStatus::Running, 65.0),
                PipelineAgent::new("feature-engineering", "Feature Engineering", AgentRole::Primary),
                PipelineAgent::new("model-training", "Model Training", AgentRole::Primary),
                PipelineAgent::new("insight-generation", "Insight Generation", AgentRole::Primary),
                PipelineAgent::new("communication", "Communication Hub", AgentRole::Orchestrator)
                    .with_state(AgentStatus::Running, 45.0),
            ],
        }
    }
}

/// A project listed on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: u32,
    pub name: String,
    pub status: AgentStatus,
    pub progress: u8,
}

/// Alert severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Error,
}

/// A recent alert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: u32,
    pub severity: AlertSeverity,
    pub message: String,
    /// Age in minutes
    #[serde(rename = "minutesAgo")]
    pub minutes_ago: u32,
}

/// Projects shown on a fresh dashboard
pub fn default_projects() -> Vec<Project> {
    [
        (1, "Customer Segmentation", AgentStatus::Running, 78),
        (2, "Fraud Detection", AgentStatus::Completed, 100),
        (3, "Predictive Maintenance", AgentStatus::Error, 45),
        (4, "Market Analysis", AgentStatus::Idle, 0),
    ]
    .into_iter()
    .map(|(id, name, status, progress)| Project {
        id,
        name: name.to_string(),
        status,
        progress,
    })
    .collect()
}

/// Alerts shown on a fresh dashboard
pub fn default_alerts() -> Vec<Alert> {
    [
        (1, AlertSeverity::Warning, "High memory usage detected", 2),
        (2, AlertSeverity::Info, "Model training completed", 5),
        (3, AlertSeverity::Error, "Data ingestion failed", 8),
    ]
    .into_iter()
    .map(|(id, severity, message, minutes_ago)| Alert {
        id,
        severity,
        message: message.to_string(),
        minutes_ago,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_pipeline() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.agents.len(), 6);
        assert_eq!(pipeline.agents[0].id, "data-ingestion");
        assert_eq!(pipeline.agents[5].role, AgentRole::Orchestrator);
        assert_eq!(pipeline.agent("data-cleaning").unwrap().progress, 65.0);
    }

    #[test]
    fn test_only_running_agents_advance() {
        let mut rng = StdRng::seed_from_u64(1);
        let before = Pipeline::default();
        let after = before.advance(&mut rng);

        for (a, b) in before.agents.iter().zip(after.agents.iter()) {
            match a.status {
                AgentStatus::Running => {
                    assert!(b.progress >= a.progress && b.progress <= a.progress + 5.0)
                }
                _ => assert_eq!(a.progress, b.progress),
            }
            assert_eq!(a.status, b.status);
        }
    }

    #[test]
    fn test_progress_caps_at_100() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pipeline = Pipeline::default();
        for _ in 0..500 {
            pipeline = pipeline.advance(&mut rng);
        }
        assert_eq!(pipeline.agent("data-cleaning").unwrap().progress, 100.0);
        assert_eq!(pipeline.agent("communication").unwrap().progress, 100.0);
        assert_eq!(pipeline.agent("model-training").unwrap().progress, 0.0);
    }

    #[test]
    fn test_overall_progress() {
        // (100 + 65 + 0 + 0 + 0) / 5
        assert_eq!(Pipeline::default().overall_progress(), 33);
    }

    #[test]
    fn test_seed_records() {
        assert_eq!(default_projects().len(), 4);
        let alerts = default_alerts();
        assert_eq!(alerts[2].severity, AlertSeverity::Error);
    }
}
