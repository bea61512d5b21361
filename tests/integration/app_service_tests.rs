//! Integration tests for the AppService → FSM → actuators pipeline.
//!
//! These run on the host (x86_64) and verify the full chain from an
//! incoming command down to servo duty emission, display rendering, and
//! the periodic status/alert cadence — without any real hardware.

use crate::mock_hw::{snapshot_with_distance, MockHardware, RecordingDisplay, VecSink};

use aquafeeder::app::commands::AppCommand;
use aquafeeder::app::events::AppEvent;
use aquafeeder::app::service::AppService;
use aquafeeder::config::SystemConfig;
use aquafeeder::drivers::servo::{FEED_POSITIONS, NEUTRAL_DUTY, NEUTRAL_STEP};
use aquafeeder::error::SensorError;
use aquafeeder::fsm::StateId;
use aquafeeder::sensors::WaterStatus;

fn make_app() -> (AppService, MockHardware, RecordingDisplay, VecSink) {
    let mut app = AppService::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = VecSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, RecordingDisplay::new(), VecSink::new())
}

// ── Mode transitions and servo resets ─────────────────────────

#[test]
fn starts_in_normal_with_servo_parked() {
    let (app, hw, _, _) = make_app();
    assert_eq!(app.state(), StateId::Normal);
    assert_eq!(hw.last_duty(), Some(NEUTRAL_DUTY));
    assert_eq!(app.servo_step(), NEUTRAL_STEP);
}

#[test]
fn start_feeding_rewinds_and_cycles() {
    let (mut app, mut hw, mut panel, mut sink) = make_app();

    app.handle_command(AppCommand::StartFeeding, &mut hw, &mut sink);
    assert!(app.is_feeding());
    assert_eq!(app.servo_step(), 0);

    // Each tick advances one position, in order.
    for (expected_duty, _) in FEED_POSITIONS {
        app.tick(&mut hw, &mut panel, &mut sink);
        assert_eq!(hw.last_duty(), Some(expected_duty));
    }
    // And the sequence wraps.
    app.tick(&mut hw, &mut panel, &mut sink);
    assert_eq!(hw.last_duty(), Some(FEED_POSITIONS[0].0));
}

#[test]
fn feed_then_stop_ends_parked_at_neutral() {
    let (mut app, mut hw, mut panel, mut sink) = make_app();

    app.handle_command(AppCommand::StartFeeding, &mut hw, &mut sink);
    app.tick(&mut hw, &mut panel, &mut sink);
    app.tick(&mut hw, &mut panel, &mut sink);

    app.handle_command(AppCommand::StopFeeding, &mut hw, &mut sink);
    assert!(!app.is_feeding());
    assert_eq!(app.servo_step(), NEUTRAL_STEP);
    assert_eq!(hw.last_duty(), Some(NEUTRAL_DUTY));
}

#[test]
fn stop_twice_has_the_same_observable_effect_as_once() {
    let (mut app, mut hw, mut panel, mut sink) = make_app();

    app.handle_command(AppCommand::StartFeeding, &mut hw, &mut sink);
    app.tick(&mut hw, &mut panel, &mut sink);

    app.handle_command(AppCommand::StopFeeding, &mut hw, &mut sink);
    app.handle_command(AppCommand::StopFeeding, &mut hw, &mut sink);

    assert!(!app.is_feeding());
    assert_eq!(app.servo_step(), NEUTRAL_STEP);
    assert_eq!(hw.last_duty(), Some(NEUTRAL_DUTY));
}

#[test]
fn mode_changes_are_reported_once_per_change() {
    let (mut app, mut hw, _, mut sink) = make_app();

    app.handle_command(AppCommand::StartFeeding, &mut hw, &mut sink);
    app.handle_command(AppCommand::StartFeeding, &mut hw, &mut sink);
    app.handle_command(AppCommand::StopFeeding, &mut hw, &mut sink);

    let changes: Vec<_> = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::ModeChanged { .. }))
        .collect();
    assert_eq!(changes.len(), 2, "repeat start must not re-report");
}

// ── Display rendering per mode ────────────────────────────────

#[test]
fn normal_tick_renders_the_monitoring_screen() {
    let (mut app, mut hw, mut panel, mut sink) = make_app();
    app.tick(&mut hw, &mut panel, &mut sink);
    assert!(panel.contains("Press for feeding"));
    assert!(panel.contains("Level: NORMAL"));
    assert_eq!(panel.flushes, 1);
}

#[test]
fn feeding_tick_renders_the_feeding_screen() {
    let (mut app, mut hw, mut panel, mut sink) = make_app();
    app.handle_command(AppCommand::StartFeeding, &mut hw, &mut sink);
    app.tick(&mut hw, &mut panel, &mut sink);
    assert!(panel.contains("FISH FEEDING"));
    assert!(panel.contains("Press to STOP"));
}

// ── Status / alert cadence ────────────────────────────────────

#[test]
fn low_water_alert_fires_at_the_50_iteration_mark() {
    let (mut app, _, mut panel, mut sink) = make_app();
    let mut hw = MockHardware::with_distance(Ok(25.0)); // LOW band

    for _ in 0..49 {
        app.tick(&mut hw, &mut panel, &mut sink);
    }
    assert!(sink.alerts().is_empty(), "no alert before the mark");

    app.tick(&mut hw, &mut panel, &mut sink);
    assert_eq!(sink.alerts(), vec![WaterStatus::Low]);
}

#[test]
fn ok_water_never_alerts() {
    let (mut app, mut hw, mut panel, mut sink) = make_app();
    for _ in 0..120 {
        app.tick(&mut hw, &mut panel, &mut sink);
    }
    assert!(sink.alerts().is_empty());
}

#[test]
fn sensor_fault_alerts_as_error() {
    let (mut app, _, mut panel, mut sink) = make_app();
    let mut hw = MockHardware::with_distance(Err(SensorError::EchoStartTimeout));

    for _ in 0..50 {
        app.tick(&mut hw, &mut panel, &mut sink);
    }
    assert_eq!(sink.alerts(), vec![WaterStatus::Error]);
}

#[test]
fn status_report_fires_at_the_100_iteration_mark() {
    let (mut app, mut hw, mut panel, mut sink) = make_app();

    for _ in 0..100 {
        app.tick(&mut hw, &mut panel, &mut sink);
    }
    let reports: Vec<_> = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::StatusReport(_)))
        .collect();
    assert_eq!(reports.len(), 1);
}

// ── Degraded sensors never stop the pipeline ──────────────────

#[test]
fn error_snapshot_still_renders_and_feeds() {
    let (mut app, _, mut panel, mut sink) = make_app();
    let mut hw = MockHardware::with_distance(Err(SensorError::EchoEndTimeout));
    hw.snapshot.temperature_c = Err(SensorError::BusFailed);

    app.handle_command(AppCommand::StartFeeding, &mut hw, &mut sink);
    app.tick(&mut hw, &mut panel, &mut sink);

    assert!(app.is_feeding(), "sensor faults never cancel feeding");
    assert_eq!(hw.last_duty(), Some(FEED_POSITIONS[0].0));
    assert!(panel.contains("Water: Error"));
}

// ── Snapshot plumbing ─────────────────────────────────────────

#[test]
fn high_water_snapshot_classifies_high() {
    let snap = snapshot_with_distance(Ok(3.0));
    assert_eq!(snap.water_status, WaterStatus::High);
}
