//! AquaFeeder Firmware — Main Entry Point
//!
//! Hexagonal architecture with one cooperatively-scheduled control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LogEventSink    ConsoleDisplay   NetLink   │
//! │  (Sensor+Actuator)  (EventSink)     (DisplayPort)    (WiFi)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  mode FSM · feed sequence · status/alert cadence       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ControlServer (non-blocking) · FeedButton (debounce)          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every iteration polls the control server once, samples the button,
//! runs one application tick, and sleeps the loop quantum.  Each
//! sub-task is bounded: accept never blocks, an accepted connection has
//! a 2 s deadline, and the ranging wait caps at ~60 ms — so no single
//! sub-task can stall the others beyond its declared budget.
#![deny(unused_must_use)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use aquafeeder::adapters::display::ConsoleDisplay;
use aquafeeder::adapters::hardware::HardwareAdapter;
use aquafeeder::adapters::log_sink::LogEventSink;
use aquafeeder::adapters::time::SystemClock;
use aquafeeder::adapters::wifi;
use aquafeeder::app::commands::AppCommand;
use aquafeeder::app::ports::{DisplayPort, EventSink, SensorPort};
use aquafeeder::app::service::AppService;
use aquafeeder::config::{self, SystemConfig};
use aquafeeder::drivers::button::FeedButton;
use aquafeeder::drivers::hw_init;
use aquafeeder::server::ControlServer;

// ── Shutdown flag ─────────────────────────────────────────────
//
// ESP-IDF delivers no process signals; an external supervisor (or a
// test harness) flips this flag and the loop exits between iterations,
// parking the servo and closing the listener on the way out.

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request a graceful exit at the next iteration boundary.
#[allow(dead_code)]
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::Release);
}

fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Acquire)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    let config = SystemConfig::default();

    info!("AquaFeeder v{} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "water level bands: HIGH < {:.0}cm, NORMAL {:.0}-{:.0}cm, LOW > {:.0}cm",
        config.water_high_cm, config.water_high_cm, config.water_low_cm, config.water_low_cm
    );

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Nothing sensible to do without peripherals; hold here until
        // the supervisor power-cycles the board.
        error!("peripheral init failed: {e} — halting");
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Network join + clock sync (non-fatal) ──────────────
    let _net = match wifi::join(config::WIFI_SSID, config::WIFI_PASS) {
        Ok(link) => Some(link),
        Err(e) => {
            warn!("network unavailable ({e}); control server will be unreachable");
            None
        }
    };

    // ── 4. Control server ─────────────────────────────────────
    let mut server = ControlServer::bind(config.http_port, config.request_deadline_secs)?;

    // ── 5. Adapters + application service ─────────────────────
    let mut hw = HardwareAdapter::new(&config);
    let mut panel = ConsoleDisplay::new();
    let mut sink = LogEventSink::new();
    let mut button = FeedButton::new(config.button_settle_ms);
    let clock = SystemClock::new();

    let mut app = AppService::new(config.clone());
    app.start(&mut hw, &mut sink);

    info!("system ready, entering control loop");

    // ── 6. Control loop ───────────────────────────────────────
    while !shutdown_requested() {
        if let Err(e) = run_iteration(
            &mut server,
            &mut app,
            &mut hw,
            &mut panel,
            &mut sink,
            &mut button,
            &clock,
        ) {
            // Transient failures never terminate the loop: log, back
            // off for a second, carry on.
            error!("loop iteration failed: {e}");
            thread::sleep(Duration::from_secs(1));
            continue;
        }

        // Feed pacing dominates the period while the servo is cycling.
        if app.is_feeding() {
            thread::sleep(Duration::from_millis(config.feed_step_delay_ms));
        }
        thread::sleep(Duration::from_millis(config.loop_interval_ms));
    }

    // ── 7. Graceful exit: park the servo, close the listener ──
    info!("shutdown requested — parking servo");
    app.handle_command(AppCommand::StopFeeding, &mut hw, &mut sink);
    drop(server);
    info!("cleanup complete");
    Ok(())
}

/// One cooperative iteration: server poll, button poll, app tick.
fn run_iteration(
    server: &mut ControlServer,
    app: &mut AppService,
    hw: &mut HardwareAdapter,
    panel: &mut impl DisplayPort,
    sink: &mut impl EventSink,
    button: &mut FeedButton,
    clock: &SystemClock,
) -> aquafeeder::error::Result<()> {
    // 1. At most one network request per iteration.
    server.poll(app, hw, sink)?;

    // 2. Physical input: debounced edge toggles the feeding mode.
    let now_ms = (clock.uptime_us() / 1000) as u32;
    button.poll(hw.button_level_high(), now_ms);
    if button.take_pending() {
        info!("button press — toggling feeding mode");
        app.handle_command(AppCommand::ToggleFeeding, hw, sink);
    }

    // 3. Sensors, display, feed sequence, periodic events.
    app.tick(hw, panel, sink);

    Ok(())
}
