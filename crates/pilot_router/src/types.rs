//! Core types shared by the router and its consumers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RouterError;

/// The four agent categories a request can be routed to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgentCategory {
    /// Cleaning and structural fixes (Data Engineer)
    Preprocessing,
    /// Exploratory analysis (Data Analyst)
    Exploration,
    /// Model training and evaluation (Data Scientist)
    Modeling,
    /// Business-facing summaries (Insight Agent)
    Insight,
}

impl AgentCategory {
    /// All categories in rule priority order
    pub const ALL: [AgentCategory; 4] = [
        Self::Preprocessing,
        Self::Exploration,
        Self::Modeling,
        Self::Insight,
    ];

    /// Lowercase label used in config files and logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Preprocessing => "preprocessing",
            Self::Exploration => "exploration",
            Self::Modeling => "modeling",
            Self::Insight => "insight",
        }
    }

    /// Display name of the agent that handles this category
    pub fn agent_name(&self) -> &'static str {
        match self {
            Self::Preprocessing => "Data Engineer",
            Self::Exploration => "Data Analyst",
            Self::Modeling => "Data Scientist",
            Self::Insight => "Insight Agent",
        }
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgentCategory {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preprocessing" | "engineer" => Ok(Self::Preprocessing),
            "exploration" | "analyst" => Ok(Self::Exploration),
            "modeling" | "modelling" | "scientist" => Ok(Self::Modeling),
            "insight" => Ok(Self::Insight),
            other => Err(RouterError::UnknownCategory(other.to_string())),
        }
    }
}

/// Outcome of routing a piece of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    /// Resolved category
    pub category: AgentCategory,
    /// Human-readable routing status line
    #[serde(rename = "statusLine")]
    pub status_line: String,
    /// Index of the matching rule; `None` when the default route was taken
    #[serde(rename = "matchedRule", skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<usize>,
}

impl RouteDecision {
    /// Whether no rule matched and the default route was used
    pub fn is_default(&self) -> bool {
        self.matched_rule.is_none()
    }
}
