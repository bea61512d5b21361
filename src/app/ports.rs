//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, the servo, the display panel, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly — and the whole pipeline runs against mocks on the host.

use crate::sensors::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Re-sample every sensor and return a fresh snapshot.
    fn read_all(&mut self) -> SensorSnapshot;

    /// Raw feed-button level: `true` = idle (pull-up), `false` = pressed.
    fn button_level_high(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the feed servo.
/// Writes are fire-and-forget.
pub trait ActuatorPort {
    /// Hold the servo at the given LEDC duty count.
    fn set_servo_duty(&mut self, duty: u16);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → panel)
// ───────────────────────────────────────────────────────────────

/// Frame-oriented display contract: clear, place text lines, flush.
/// The panel driver behind it is out of the domain's sight — a 128×64
/// OLED in production, a recording stub in tests.
pub trait DisplayPort {
    /// Start a new blank frame.
    fn clear(&mut self);

    /// Place a line of text at pixel position (x, y).
    fn text(&mut self, s: &str, x: i32, y: i32);

    /// Push the assembled frame to the panel.
    fn flush(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log today;
/// MQTT or a display ticker tomorrow).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
