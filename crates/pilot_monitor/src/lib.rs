//! # pilot_monitor
//!
//! Simulated monitoring for the DataPilot dashboard: system gauges, agent
//! pipeline progress and a demo progress bar, each advanced by a periodic
//! task and published as a single snapshot. Pipeline agents also carry
//! range-checked configuration panels.
//!
//! ```no_run
//! use pilot_monitor::{Dashboard, MonitorConfig};
//!
//! # async fn run() -> pilot_monitor::MonitorResult<()> {
//! let dashboard = Dashboard::start(&MonitorConfig::default())?;
//! let mut updates = dashboard.subscribe();
//! while updates.changed().await.is_ok() {
//!     let snapshot = updates.borrow().clone();
//!     println!("cpu {}%", snapshot.metrics.cpu.percent());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod settings;
pub mod ticker;

pub use config::MonitorConfig;
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use demo::{DemoPlayback, DEMO_STEP};
pub use error::{MonitorError, MonitorResult};
pub use metrics::{Gauge, GaugeLevel, SystemMetrics};
pub use pipeline::{
    default_alerts, default_projects, AgentRole, AgentStatus, Alert, AlertSeverity, Pipeline,
    PipelineAgent, Project,
};
pub use settings::{default_panels, AgentSettings, SettingKind, SettingSpec, SettingValue};
pub use ticker::Ticker;
