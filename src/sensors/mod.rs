//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces a [`SensorSnapshot`] on
//! demand.  Snapshots are immutable "truth at one instant" bundles and
//! are rebuilt from scratch every time one is needed — physical
//! conditions may have changed, so nothing is cached between calls.

pub mod distance;
pub mod temperature;
pub mod turbidity;

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;
use distance::{MonotonicClock, RangeFinder};
use temperature::TemperatureProbe;
use turbidity::{Turbidity, TurbiditySensor, WaterClarity};

// ---------------------------------------------------------------------------
// Water level classification
// ---------------------------------------------------------------------------

/// Water level bands.  The rangefinder looks down at the surface, so a
/// *short* distance means a *high* level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterStatus {
    High,
    Ok,
    Low,
    Error,
}

impl WaterStatus {
    /// Wire/display form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Ok => "OK",
            Self::Low => "LOW",
            Self::Error => "ERROR",
        }
    }
}

/// Classify a distance reading into a water level band.  Pure.
///
/// Error iff the reading failed; High iff distance < `high_cm`;
/// Low iff distance > `low_cm`; Ok otherwise (requires `high_cm < low_cm`).
pub fn classify_water(
    reading: &Result<f32, SensorError>,
    high_cm: f32,
    low_cm: f32,
) -> WaterStatus {
    match reading {
        Err(_) => WaterStatus::Error,
        Ok(d) if *d < high_cm => WaterStatus::High,
        Ok(d) if *d > low_cm => WaterStatus::Low,
        Ok(_) => WaterStatus::Ok,
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A point-in-time bundle of every sensor in the system, plus the
/// formatted wall-clock strings the display and status payload show.
#[derive(Debug, Clone)]
pub struct SensorSnapshot {
    /// Water temperature (°C, one decimal) or the failure reason.
    pub temperature_c: Result<f32, SensorError>,
    /// Distance to the water surface (cm, one decimal) or the failure reason.
    pub distance_cm: Result<f32, SensorError>,
    /// Level band derived from `distance_cm`.
    pub water_status: WaterStatus,
    /// Raw turbidity sample or the failure reason.
    pub turbidity: Result<Turbidity, SensorError>,
    /// Clarity band derived from `turbidity`.
    pub clarity: WaterClarity,
    /// Time of day, "HH:MM:SS".
    pub time: heapless::String<16>,
    /// Date, "DD/MM/YYYY".
    pub date: heapless::String<16>,
}

// ---------------------------------------------------------------------------
// Hub
// ---------------------------------------------------------------------------

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub<Trig, Echo, Clk> {
    pub range: RangeFinder<Trig, Echo, Clk>,
    pub probe: TemperatureProbe,
    pub turbidity: TurbiditySensor,
    high_cm: f32,
    low_cm: f32,
    very_dirty_v: f32,
    dirty_v: f32,
}

impl<Trig, Echo, Clk> SensorHub<Trig, Echo, Clk>
where
    Trig: OutputPin,
    Echo: InputPin,
    Clk: MonotonicClock,
{
    /// Construct a new hub.  Pass in pre-built drivers (built where
    /// peripheral ownership is established) and the classification
    /// thresholds from config.
    pub fn new(
        range: RangeFinder<Trig, Echo, Clk>,
        probe: TemperatureProbe,
        turbidity: TurbiditySensor,
        high_cm: f32,
        low_cm: f32,
        very_dirty_v: f32,
        dirty_v: f32,
    ) -> Self {
        Self {
            range,
            probe,
            turbidity,
            high_cm,
            low_cm,
            very_dirty_v,
            dirty_v,
        }
    }

    /// Re-sample every sensor and build a fresh snapshot.  Individual
    /// read failures land in the snapshot as tagged errors — a flaky
    /// sensor must not take the control loop down.
    pub fn read_all(
        &mut self,
        time: heapless::String<16>,
        date: heapless::String<16>,
    ) -> SensorSnapshot {
        let temperature_c = self.probe.read();
        let distance_cm = self.range.measure();
        let water_status = classify_water(&distance_cm, self.high_cm, self.low_cm);
        let turbidity = self.turbidity.read();
        let clarity =
            turbidity::classify_clarity(&turbidity, self.very_dirty_v, self.dirty_v);

        if let Err(e) = &distance_cm {
            log::debug!("ranging failed: {e}");
        }

        SensorSnapshot {
            temperature_c,
            distance_cm,
            water_status,
            turbidity,
            clarity,
            time,
            date,
        }
    }
}
