//! Integration tests for the dashboard simulators.

use std::time::Duration;

use pilot_monitor::{AgentStatus, Dashboard, MonitorConfig, SettingValue, SystemMetrics};

fn seeded() -> MonitorConfig {
    MonitorConfig {
        seed: Some(2024),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_metrics_update_every_interval() {
    let dashboard = Dashboard::start(&seeded()).unwrap();
    let initial = dashboard.snapshot();

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(dashboard.snapshot().metrics, initial.metrics);

    tokio::time::sleep(Duration::from_millis(2_100)).await;
    let updated = dashboard.snapshot();
    assert_ne!(updated.metrics, SystemMetrics::default());
    for (_, gauge) in updated.metrics.gauges() {
        assert!(gauge.value >= gauge.min && gauge.value <= gauge.max);
    }
}

#[tokio::test(start_paused = true)]
async fn test_pipeline_advances_running_agents() {
    let dashboard = Dashboard::start(&seeded()).unwrap();

    tokio::time::sleep(Duration::from_millis(2_050)).await;
    let snapshot = dashboard.snapshot();
    let cleaning = snapshot.pipeline.agent("data-cleaning").unwrap();
    assert_eq!(cleaning.status, AgentStatus::Running);
    assert!(cleaning.progress >= 65.0 && cleaning.progress <= 70.0);

    let training = snapshot.pipeline.agent("model-training").unwrap();
    assert_eq!(training.progress, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_demo_plays_to_completion_and_pauses() {
    let dashboard = Dashboard::start(&seeded()).unwrap();
    dashboard.play_demo();

    tokio::time::sleep(Duration::from_millis(1_050)).await;
    let demo = dashboard.snapshot().demo;
    assert_eq!(demo.progress, 20);
    assert!(demo.playing);

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    let demo = dashboard.snapshot().demo;
    assert_eq!(demo.progress, 100);
    assert!(!demo.playing);
}

#[tokio::test(start_paused = true)]
async fn test_paused_demo_does_not_move() {
    let dashboard = Dashboard::start(&seeded()).unwrap();
    dashboard.play_demo();
    tokio::time::sleep(Duration::from_millis(550)).await;
    dashboard.pause_demo();
    let paused_at = dashboard.snapshot().demo.progress;

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(dashboard.snapshot().demo.progress, paused_at);

    dashboard.reset_demo();
    assert_eq!(dashboard.snapshot().demo.progress, 0);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_latest_snapshot() {
    let dashboard = Dashboard::start(&seeded()).unwrap();
    let mut updates = dashboard.subscribe();

    updates.changed().await.unwrap();
    let first = updates.borrow_and_update().clone();
    assert!(first.revision >= 1);

    updates.changed().await.unwrap();
    let second = updates.borrow_and_update().clone();
    assert!(second.revision > first.revision);
}

#[tokio::test(start_paused = true)]
async fn test_stop_freezes_state() {
    let dashboard = Dashboard::start(&seeded()).unwrap();
    assert!(dashboard.is_running());

    tokio::time::sleep(Duration::from_millis(3_100)).await;
    dashboard.stop();
    let frozen = dashboard.snapshot();

    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert_eq!(dashboard.snapshot(), frozen);
    assert!(!dashboard.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_dashboard_stops_simulators() {
    let dashboard = Dashboard::start(&seeded()).unwrap();
    let mut updates = dashboard.subscribe();

    tokio::time::sleep(Duration::from_millis(2_050)).await;
    let last = updates.borrow_and_update().revision;
    assert!(last >= 1);

    drop(dashboard);
    tokio::time::sleep(Duration::from_millis(10_000)).await;

    assert_eq!(updates.borrow().revision, last);
    // Every ticker released the shared state, so the sender is gone
    assert!(updates.has_changed().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_agent_settings_survive_ticks() {
    let config = MonitorConfig {
        agents: [(
            "model-training".to_string(),
            [("epochs".to_string(), SettingValue::Number(250.0))].into(),
        )]
        .into(),
        ..seeded()
    };
    let dashboard = Dashboard::start(&config).unwrap();
    dashboard.configure_agent("model-training", "algorithm", "XGBoost").unwrap();

    tokio::time::sleep(Duration::from_millis(6_100)).await;
    let panel = dashboard.agent_settings("model-training").unwrap();
    assert_eq!(panel.get("epochs"), Some(&SettingValue::Number(250.0)));
    assert_eq!(panel.get("algorithm"), Some(&SettingValue::Choice("xgboost".to_string())));
    assert!(dashboard.agent_settings("communication").unwrap().specs.is_empty());
}

#[test]
fn test_snapshot_serializes_for_display() {
    let dashboard = Dashboard::new(&seeded()).unwrap();
    let json = serde_json::to_value(dashboard.snapshot()).unwrap();
    assert_eq!(json["pipeline"]["agents"][0]["status"], "completed");
    assert_eq!(json["alerts"][0]["severity"], "warning");
    assert_eq!(json["alerts"][0]["minutesAgo"], 2);
    assert!(json.get("updatedAt").is_some());
    assert_eq!(json["settings"]["data-cleaning"]["values"]["outlier-threshold"], 75.0);
}
