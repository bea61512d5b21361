//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call and serves canned sensor snapshots so
//! tests can assert on the full command history without touching real
//! GPIO/PWM registers.

use aquafeeder::app::events::AppEvent;
use aquafeeder::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use aquafeeder::error::SensorError;
use aquafeeder::sensors::turbidity::{Turbidity, WaterClarity};
use aquafeeder::sensors::{classify_water, SensorSnapshot, WaterStatus};

// ── Snapshot factory ──────────────────────────────────────────

pub fn snapshot_with_distance(distance: Result<f32, SensorError>) -> SensorSnapshot {
    let water_status = classify_water(&distance, 5.0, 20.0);
    SensorSnapshot {
        temperature_c: Ok(24.5),
        distance_cm: distance,
        water_status,
        turbidity: Ok(Turbidity {
            percent: 90.9,
            volts: 3.0,
        }),
        clarity: WaterClarity::Clear,
        time: heapless::String::try_from("10:20:30").unwrap(),
        date: heapless::String::try_from("06/08/2026").unwrap(),
    }
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Every servo duty commanded, in order.
    pub duties: Vec<u16>,
    /// Snapshot served on the next `read_all`.
    pub snapshot: SensorSnapshot,
    /// Raw button level returned by `button_level_high`.
    pub button_high: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            duties: Vec::new(),
            snapshot: snapshot_with_distance(Ok(12.0)),
            button_high: true,
        }
    }

    pub fn with_distance(distance: Result<f32, SensorError>) -> Self {
        let mut hw = Self::new();
        hw.snapshot = snapshot_with_distance(distance);
        hw
    }

    pub fn last_duty(&self) -> Option<u16> {
        self.duties.last().copied()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.snapshot.clone()
    }

    fn button_level_high(&mut self) -> bool {
        self.button_high
    }
}

impl ActuatorPort for MockHardware {
    fn set_servo_duty(&mut self, duty: u16) {
        self.duties.push(duty);
    }
}

// ── RecordingDisplay ──────────────────────────────────────────

#[derive(Default)]
pub struct RecordingDisplay {
    pub lines: Vec<String>,
    pub flushes: usize,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl DisplayPort for RecordingDisplay {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn text(&mut self, s: &str, _x: i32, _y: i32) {
        self.lines.push(s.to_owned());
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

// ── VecSink ───────────────────────────────────────────────────

pub struct VecSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn alerts(&self) -> Vec<WaterStatus> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::WaterAlert { status, .. } => Some(*status),
                _ => None,
            })
            .collect()
    }
}

impl Default for VecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
