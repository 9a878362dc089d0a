//! Monitor command - Print simulated dashboard snapshots or an agent's settings.

use anyhow::Result;
use clap::Args;
use tracing::info;

use pilot_monitor::{
    AgentSettings, AgentStatus, Dashboard, DashboardSnapshot, GaugeLevel, SettingKind,
};

use super::InvalidArgs;
use crate::config::PilotConfig;

#[derive(Args)]
pub struct MonitorArgs {
    /// Number of snapshots to print before exiting
    #[arg(short, long, default_value_t = 5)]
    ticks: u32,

    /// Start the demo playback
    #[arg(long)]
    demo: bool,

    /// Print snapshots as JSON lines
    #[arg(long)]
    json: bool,

    /// Show the settings panel of a pipeline agent instead of snapshots
    #[arg(long, value_name = "ID")]
    agent: Option<String>,

    /// Change a setting of --agent before printing it (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment, requires = "agent")]
    set: Vec<(String, String)>,
}

/// Split `key=value`
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

pub async fn execute(args: MonitorArgs, config: &PilotConfig) -> Result<()> {
    if args.ticks == 0 {
        return Err(InvalidArgs("--ticks must be at least 1".to_string()).into());
    }

    if let Some(agent_id) = &args.agent {
        let dashboard = Dashboard::new(&config.monitor)?;
        let panel = configure(&dashboard, agent_id, &args.set)?;
        return print_panel(&panel, args.json);
    }

    let dashboard = Dashboard::start(&config.monitor)?;
    if args.demo {
        dashboard.play_demo();
    }
    let mut updates = dashboard.subscribe();

    print_snapshot(&dashboard.snapshot(), args.json)?;
    for _ in 1..args.ticks {
        if updates.changed().await.is_err() {
            break;
        }
        let snapshot = updates.borrow_and_update().clone();
        print_snapshot(&snapshot, args.json)?;
    }

    dashboard.stop();
    info!("Monitor finished after {} snapshots", args.ticks);
    Ok(())
}

/// Apply `--set` assignments in order and return the resulting panel
fn configure(
    dashboard: &Dashboard,
    agent_id: &str,
    assignments: &[(String, String)],
) -> Result<AgentSettings> {
    for (key, value) in assignments {
        dashboard
            .configure_agent(agent_id, key, value)
            .map_err(|e| InvalidArgs(e.to_string()))?;
    }
    dashboard
        .agent_settings(agent_id)
        .map_err(|e| InvalidArgs(e.to_string()).into())
}

fn print_panel(panel: &AgentSettings, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(panel)?);
        return Ok(());
    }

    println!("⚙️  {} ({})", panel.title, panel.agent_id);
    println!("   {}", panel.description);
    if panel.specs.is_empty() {
        println!("   No configurable settings");
    }
    for spec in &panel.specs {
        let value = panel
            .get(&spec.key)
            .map(ToString::to_string)
            .unwrap_or_default();
        let bounds = match &spec.kind {
            SettingKind::Select { options } => options.join(" | "),
            SettingKind::Slider { min, max, step } => format!("{}..{} step {}", min, max, step),
            SettingKind::Toggle => "enabled | disabled".to_string(),
        };
        println!("   {:<22} {:<18} {:<16} [{}]", spec.label, spec.key, value, bounds);
    }
    Ok(())
}

fn print_snapshot(snapshot: &DashboardSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
        return Ok(());
    }

    println!("📈 Revision {} at {}", snapshot.revision, snapshot.updated_at.format("%H:%M:%S%.3f"));
    for (name, gauge) in snapshot.metrics.gauges() {
        let marker = match gauge.level() {
            GaugeLevel::Healthy => "✅",
            GaugeLevel::Warning => "⚠️ ",
            GaugeLevel::Critical => "❌",
        };
        println!("   {} {:<8} {:>3}%", marker, name, gauge.percent());
    }
    for agent in &snapshot.pipeline.agents {
        let marker = match agent.status {
            AgentStatus::Idle => "⏸ ",
            AgentStatus::Running => "🔄",
            AgentStatus::Completed => "✅",
            AgentStatus::Error => "❌",
        };
        println!("   {} {:<20} {:>5.1}%", marker, agent.name, agent.progress);
    }
    println!("   Pipeline overall: {}%", snapshot.pipeline.overall_progress());
    if snapshot.demo.playing || snapshot.demo.progress > 0 {
        println!(
            "   Demo: {}% ({})",
            snapshot.demo.progress,
            if snapshot.demo.playing { "playing" } else { "paused" }
        );
    }
    println!();
    Ok(())
}
