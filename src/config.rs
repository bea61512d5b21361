//! System configuration parameters
//!
//! All tunable parameters for the AquaFeeder controller.  Everything the
//! control loop, the sensor hub, and the control server consume lives
//! here so a bench build can be retuned in one place.

use serde::{Deserialize, Serialize};

/// WiFi credentials for the startup station join.  Baked in at build
/// time; the device has no provisioning surface.
pub const WIFI_SSID: &str = "aquarium-net";
pub const WIFI_PASS: &str = "change-me-please";

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Water level (HC-SR04 mounted above the water surface) ---
    /// Distance below this means the tank is nearly full (cm)
    pub water_high_cm: f32,
    /// Distance above this means water must be added (cm)
    pub water_low_cm: f32,

    // --- Water clarity ---
    /// Below this sensor voltage the water is very dirty (V)
    pub turbidity_very_dirty_v: f32,
    /// Below this sensor voltage the water is dirty (V)
    pub turbidity_dirty_v: f32,

    // --- Ranging ---
    /// Bound on each echo-edge poll; exceeded -> ranging error (µs)
    pub echo_timeout_us: u64,

    // --- Feeding ---
    /// Pacing delay between servo steps while feeding (ms)
    pub feed_step_delay_ms: u64,

    // --- Input ---
    /// Contact-bounce settle window after a press edge (ms)
    pub button_settle_ms: u32,

    // --- Network ---
    /// Control server TCP port
    pub http_port: u16,
    /// Per-connection read/write deadline (s)
    pub request_deadline_secs: u64,

    // --- Timing ---
    /// Control loop sleep quantum (ms)
    pub loop_interval_ms: u64,
    /// Iterations between status summaries on the log
    pub status_report_every: u32,
    /// Iterations between water-level alert checks
    pub alert_check_every: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Water level
            water_high_cm: 5.0,
            water_low_cm: 20.0,

            // Clarity
            turbidity_very_dirty_v: 1.5,
            turbidity_dirty_v: 2.5,

            // Ranging
            echo_timeout_us: 30_000,

            // Feeding
            feed_step_delay_ms: 300,

            // Input
            button_settle_ms: 200,

            // Network
            http_port: 80,
            request_deadline_secs: 2,

            // Timing
            loop_interval_ms: 100,    // 10 Hz
            status_report_every: 100, // every ~10 s
            alert_check_every: 50,    // every ~5 s
        }
    }
}
