//! Dashboard state shared by the simulators.
//!
//! Each simulator runs on its own [`Ticker`] and publishes the whole
//! snapshot through a `watch` channel after every update. Readers only
//! ever see the latest state.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::demo::DemoPlayback;
use crate::error::{MonitorError, MonitorResult};
use crate::metrics::SystemMetrics;
use crate::pipeline::{default_alerts, default_projects, Alert, Pipeline, Project};
use crate::settings::{default_panels, AgentSettings};
use crate::ticker::Ticker;

/// Everything the dashboard displays
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub metrics: SystemMetrics,
    pub pipeline: Pipeline,
    pub projects: Vec<Project>,
    pub alerts: Vec<Alert>,
    pub demo: DemoPlayback,
    /// Configuration panel of every pipeline agent, keyed by agent id
    pub settings: BTreeMap<String, AgentSettings>,
    /// Number of updates applied so far
    pub revision: u64,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            metrics: SystemMetrics::default(),
            pipeline: Pipeline::default(),
            projects: default_projects(),
            alerts: default_alerts(),
            demo: DemoPlayback::default(),
            settings: default_panels(&Pipeline::default()),
            revision: 0,
            updated_at: Utc::now(),
        }
    }
}

struct DashboardState {
    snapshot: DashboardSnapshot,
    rng: StdRng,
}

struct Shared {
    state: Mutex<DashboardState>,
    updates: watch::Sender<DashboardSnapshot>,
}

impl Shared {
    fn update(&self, apply: impl FnOnce(&mut DashboardSnapshot, &mut StdRng)) {
        let snapshot = {
            let mut state = self.state.lock();
            let DashboardState { snapshot, rng } = &mut *state;
            apply(snapshot, rng);
            snapshot.revision += 1;
            snapshot.updated_at = Utc::now();
            snapshot.clone()
        };
        self.updates.send_replace(snapshot);
    }

    /// Tick the demo only while it is playing
    fn tick_demo(&self) {
        let snapshot = {
            let mut state = self.state.lock();
            let demo = &mut state.snapshot.demo;
            if !demo.playing {
                return;
            }
            demo.tick();
            state.snapshot.revision += 1;
            state.snapshot.updated_at = Utc::now();
            state.snapshot.clone()
        };
        self.updates.send_replace(snapshot);
    }
}

/// Live dashboard with metrics, pipeline and demo simulators
pub struct Dashboard {
    shared: Arc<Shared>,
    tickers: Vec<Ticker>,
}

impl Dashboard {
    /// Build a dashboard without starting any simulator.
    pub fn new(config: &MonitorConfig) -> MonitorResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let snapshot = DashboardSnapshot {
            settings: config.agent_settings()?,
            ..Default::default()
        };
        let (updates, _) = watch::channel(snapshot.clone());
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(DashboardState { snapshot, rng }),
                updates,
            }),
            tickers: Vec::new(),
        })
    }

    /// Build a dashboard and start its simulators on the current runtime.
    pub fn start(config: &MonitorConfig) -> MonitorResult<Self> {
        let mut dashboard = Self::new(config)?;

        let shared = dashboard.shared.clone();
        dashboard.tickers.push(Ticker::spawn(
            "metrics",
            config.metrics_interval(),
            move || shared.update(|s, rng| s.metrics = s.metrics.next(rng)),
        ));

        let shared = dashboard.shared.clone();
        dashboard.tickers.push(Ticker::spawn(
            "pipeline",
            config.pipeline_interval(),
            move || shared.update(|s, rng| s.pipeline = s.pipeline.advance(rng)),
        ));

        let shared = dashboard.shared.clone();
        dashboard.tickers.push(Ticker::spawn(
            "demo",
            config.demo_interval(),
            move || shared.tick_demo(),
        ));

        info!(
            "Dashboard started (metrics every {:?}, pipeline every {:?})",
            config.metrics_interval(),
            config.pipeline_interval()
        );
        Ok(dashboard)
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.shared.state.lock().snapshot.clone()
    }

    /// Advance the gauges once
    pub fn step_metrics(&self) {
        self.shared.update(|s, rng| s.metrics = s.metrics.next(rng));
    }

    /// Advance the pipeline once
    pub fn step_pipeline(&self) {
        self.shared.update(|s, rng| s.pipeline = s.pipeline.advance(rng));
    }

    pub fn play_demo(&self) {
        debug!("Demo playback started");
        self.shared.update(|s, _| s.demo.play());
    }

    pub fn pause_demo(&self) {
        debug!("Demo playback paused");
        self.shared.update(|s, _| s.demo.pause());
    }

    pub fn toggle_demo(&self) {
        self.shared.update(|s, _| s.demo.toggle());
    }

    pub fn reset_demo(&self) {
        self.shared.update(|s, _| s.demo.reset());
    }

    /// Settings panel of a pipeline agent
    pub fn agent_settings(&self, agent_id: &str) -> MonitorResult<AgentSettings> {
        self.shared
            .state
            .lock()
            .snapshot
            .settings
            .get(agent_id)
            .cloned()
            .ok_or_else(|| MonitorError::UnknownAgent(agent_id.to_string()))
    }

    /// Change one agent setting from its textual form and publish the result
    pub fn configure_agent(&self, agent_id: &str, key: &str, raw: &str) -> MonitorResult<()> {
        let snapshot = {
            let mut state = self.shared.state.lock();
            let panel = state
                .snapshot
                .settings
                .get_mut(agent_id)
                .ok_or_else(|| MonitorError::UnknownAgent(agent_id.to_string()))?;
            panel.set_raw(key, raw)?;
            state.snapshot.revision += 1;
            state.snapshot.updated_at = Utc::now();
            state.snapshot.clone()
        };
        debug!(agent = agent_id, key, value = raw, "Agent setting changed");
        self.shared.updates.send_replace(snapshot);
        Ok(())
    }

    /// Whether any simulator task is still alive
    pub fn is_running(&self) -> bool {
        self.tickers.iter().any(|t| !t.is_stopped())
    }

    /// Stop every simulator. The last snapshot stays readable.
    pub fn stop(&self) {
        for ticker in &self.tickers {
            ticker.stop();
        }
        info!("Dashboard stopped");
    }
}
