//! Priority-ordered intent router.

use tracing::debug;

use crate::error::RouterResult;
use crate::rules::{builtin_rules, DefaultRoute, RouterConfig, RoutingRule};
use crate::types::RouteDecision;

/// Maps free text to an agent category.
///
/// Rules are evaluated in order and the first match wins. Text that matches
/// nothing takes the default route, so routing is total and deterministic.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Vec<RoutingRule>,
    default: DefaultRoute,
}

impl IntentRouter {
    /// Create a router with the built-in rule set
    pub fn new() -> Self {
        Self::with_rules(builtin_rules(), DefaultRoute::default())
    }

    /// Create a router from explicit rules
    pub fn with_rules(rules: Vec<RoutingRule>, default: DefaultRoute) -> Self {
        Self { rules, default }
    }

    /// Create a router from the router section of the config file
    pub fn from_config(config: &RouterConfig) -> RouterResult<Self> {
        Ok(Self::with_rules(config.compile_rules()?, config.default_route()))
    }

    /// Route `text` to a category
    pub fn route(&self, text: &str) -> RouteDecision {
        let decision = self
            .rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(text))
            .map(|(index, rule)| RouteDecision {
                category: rule.category,
                status_line: rule.status_line.clone(),
                matched_rule: Some(index),
            })
            .unwrap_or_else(|| RouteDecision {
                category: self.default.category,
                status_line: self.default.status_line.clone(),
                matched_rule: None,
            });

        debug!(
            category = %decision.category,
            rule = ?decision.matched_rule,
            "Routed request"
        );
        decision
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// The route taken when no rule matches
    pub fn default_route(&self) -> &DefaultRoute {
        &self.default
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}
