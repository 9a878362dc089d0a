//! # pilot_router
//!
//! Keyword intent router for DataPilot.
//!
//! Free text is matched against an ordered list of case-insensitive rules and
//! assigned to one of four agent categories. The router is pure: the same
//! text always yields the same category and status line.
//!
//! # Example
//!
//! ```rust
//! use pilot_router::{AgentCategory, IntentRouter};
//!
//! let router = IntentRouter::new();
//! let decision = router.route("train a model for accuracy");
//! assert_eq!(decision.category, AgentCategory::Modeling);
//! ```

pub mod error;
pub mod router;
pub mod rules;
pub mod types;

pub use error::{RouterError, RouterResult};
pub use router::IntentRouter;
pub use rules::{builtin_rules, DefaultRoute, RouterConfig, RoutingRule, RuleConfig};
pub use types::{AgentCategory, RouteDecision};
