//! Chat session configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::content::MAX_PREVIEW_LINES;
use crate::error::ChatError;

/// Default delay before a simulated agent reply
pub const DEFAULT_REPLY_DELAY_MS: u64 = 2000;

/// How a text submission is treated while a reply is still pending
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PendingPolicy {
    /// Ignore new text until the pending reply has been delivered
    #[default]
    Reject,
    /// Accept and schedule every submission independently
    Concurrent,
    /// Accept and cancel replies that are still in flight
    Supersede,
}

impl fmt::Display for PendingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reject => "reject",
            Self::Concurrent => "concurrent",
            Self::Supersede => "supersede",
        })
    }
}

impl FromStr for PendingPolicy {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "concurrent" => Ok(Self::Concurrent),
            "supersede" => Ok(Self::Supersede),
            other => Err(ChatError::InvalidSetting {
                key: "pending_policy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Chat section of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay before the canned agent reply is appended
    pub reply_delay_ms: u64,
    pub pending_policy: PendingPolicy,
    /// Number of preview lines kept for uploads (capped at five)
    pub preview_lines: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            pending_policy: PendingPolicy::default(),
            preview_lines: MAX_PREVIEW_LINES,
        }
    }
}

impl ChatConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply `PILOT_REPLY_DELAY_MS` and `PILOT_PENDING_POLICY`
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(delay) = lookup("PILOT_REPLY_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(value) => self.reply_delay_ms = value,
                Err(_) => warn!("Ignoring invalid PILOT_REPLY_DELAY_MS: {}", delay),
            }
        }

        if let Some(policy) = lookup("PILOT_PENDING_POLICY") {
            match policy.parse::<PendingPolicy>() {
                Ok(value) => self.pending_policy = value,
                Err(e) => warn!("Ignoring PILOT_PENDING_POLICY: {}", e),
            }
        }
    }

    /// Set the reply delay
    pub fn reply_delay_ms(mut self, ms: u64) -> Self {
        self.reply_delay_ms = ms;
        self
    }

    /// Set the pending policy
    pub fn pending_policy(mut self, policy: PendingPolicy) -> Self {
        self.pending_policy = policy;
        self
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Effective preview length
    pub fn preview_limit(&self) -> usize {
        self.preview_lines.min(MAX_PREVIEW_LINES)
    }
}
