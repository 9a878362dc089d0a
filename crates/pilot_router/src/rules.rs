//! Routing rules and the built-in rule set.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};
use crate::types::AgentCategory;

/// Cleaning and structural vocabulary
pub const PREPROCESSING_PATTERN: &str = r"clean|remove|null|duplicate|column|encode";
/// Exploratory vocabulary
pub const EXPLORATION_PATTERN: &str = r"analy[sz]e|trend|distribution|correlation|\beda\b";
/// Modeling vocabulary
pub const MODELING_PATTERN: &str =
    r"model|predict|train|accuracy|\bauc\b|\bf1\b|\broc\b|feature importance";
/// Insight vocabulary
pub const INSIGHT_PATTERN: &str = r"insight|business|summary|key factor|explain";

pub const PREPROCESSING_STATUS: &str =
    "Routing to Data Engineer: preprocessing request detected (cleaning, nulls, columns).";
pub const EXPLORATION_STATUS: &str =
    "Routing to Data Analyst: exploratory analysis request detected.";
pub const MODELING_STATUS: &str =
    "Routing to Data Scientist: modeling request detected (training, prediction, metrics).";
pub const INSIGHT_STATUS: &str =
    "Routing to Insight Agent: business insight request detected.";
pub const DEFAULT_STATUS: &str =
    "No specific intent detected. Routed by default to Data Analyst for exploration.";

/// A compiled routing rule
#[derive(Debug, Clone)]
pub struct RoutingRule {
    pattern: Regex,
    /// Category assigned when the pattern matches
    pub category: AgentCategory,
    /// Status line reported for this rule
    pub status_line: String,
}

impl RoutingRule {
    /// Compile a case-insensitive rule
    pub fn new(
        pattern: &str,
        category: AgentCategory,
        status_line: impl Into<String>,
    ) -> RouterResult<Self> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RouterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            pattern: compiled,
            category,
            status_line: status_line.into(),
        })
    }

    /// Whether the pattern matches anywhere in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Source of the compiled pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Route taken when no rule matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRoute {
    pub category: AgentCategory,
    pub status_line: String,
}

impl Default for DefaultRoute {
    fn default() -> Self {
        Self {
            category: AgentCategory::Exploration,
            status_line: DEFAULT_STATUS.to_string(),
        }
    }
}

/// The built-in rule set, in priority order
pub fn builtin_rules() -> Vec<RoutingRule> {
    [
        (PREPROCESSING_PATTERN, AgentCategory::Preprocessing, PREPROCESSING_STATUS),
        (EXPLORATION_PATTERN, AgentCategory::Exploration, EXPLORATION_STATUS),
        (MODELING_PATTERN, AgentCategory::Modeling, MODELING_STATUS),
        (INSIGHT_PATTERN, AgentCategory::Insight, INSIGHT_STATUS),
    ]
    .into_iter()
    .map(|(pattern, category, status)| {
        // Constant patterns above are known to compile.
        RoutingRule::new(pattern, category, status)
            .unwrap_or_else(|e| unreachable!("built-in rule failed to compile: {e}"))
    })
    .collect()
}

/// A rule as written in a config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleConfig {
    pub pattern: String,
    pub category: AgentCategory,
    #[serde(alias = "statusLine")]
    pub status_line: String,
}

/// Router section of the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RouterConfig {
    /// Custom rules in priority order; empty means use the built-in set
    pub rules: Vec<RuleConfig>,
    /// Category used when nothing matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_category: Option<AgentCategory>,
    /// Status line used when nothing matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_status_line: Option<String>,
}

impl RouterConfig {
    /// Parse a router config from YAML
    pub fn from_yaml_str(yaml: &str) -> RouterResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Compile the configured rules, falling back to the built-in set
    pub fn compile_rules(&self) -> RouterResult<Vec<RoutingRule>> {
        if self.rules.is_empty() {
            return Ok(builtin_rules());
        }
        self.rules
            .iter()
            .map(|r| RoutingRule::new(&r.pattern, r.category, r.status_line.clone()))
            .collect()
    }

    /// Resolve the default route, filling unset fields from the built-in default
    pub fn default_route(&self) -> DefaultRoute {
        let builtin = DefaultRoute::default();
        DefaultRoute {
            category: self.default_category.unwrap_or(builtin.category),
            status_line: self
                .default_status_line
                .clone()
                .unwrap_or(builtin.status_line),
        }
    }
}
