//! Turbidity sensor (3-pin analog) driver.
//!
//! The sensor outputs a voltage proportional to light transmission —
//! higher voltage means clearer water.  The raw 12-bit ADC sample is
//! scaled to 0–3.3 V, then to a 0–100 transmission percentage.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH4 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use crate::error::SensorError;
use crate::sensors::distance::round1;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

#[cfg(not(target_os = "espidf"))]
static SIM_TURB_ADC: AtomicU16 = AtomicU16::new(3600);
#[cfg(not(target_os = "espidf"))]
static SIM_TURB_FAIL: AtomicBool = AtomicBool::new(false);

/// Inject a raw ADC sample for host tests.  `None` simulates a read failure.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_turbidity_adc(raw: Option<u16>) {
    match raw {
        Some(v) => {
            SIM_TURB_ADC.store(v, Ordering::Relaxed);
            SIM_TURB_FAIL.store(false, Ordering::Relaxed);
        }
        None => SIM_TURB_FAIL.store(true, Ordering::Relaxed),
    }
}

const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;

/// One turbidity sample: transmission percentage plus the raw voltage
/// the clarity bands are defined over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Turbidity {
    pub percent: f32,
    pub volts: f32,
}

pub struct TurbiditySensor {
    _adc_gpio: i32,
}

impl TurbiditySensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self { _adc_gpio: adc_gpio }
    }

    pub fn read(&mut self) -> Result<Turbidity, SensorError> {
        let raw = self.read_adc()?;
        let volts = f32::from(raw) * V_REF / ADC_MAX;
        Ok(Turbidity {
            percent: round1(volts / V_REF * 100.0),
            volts,
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        Ok(crate::drivers::hw_init::adc1_read(
            crate::drivers::hw_init::ADC1_CH_TURBIDITY,
        ))
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        if SIM_TURB_FAIL.load(Ordering::Relaxed) {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(SIM_TURB_ADC.load(Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// Clarity classification
// ---------------------------------------------------------------------------

/// Water clarity bands over the sensor voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterClarity {
    VeryDirty,
    Dirty,
    Clear,
    Error,
}

impl WaterClarity {
    /// Human-readable label used on the display and in the status payload.
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryDirty => "Very Dirty",
            Self::Dirty => "Dirty",
            Self::Clear => "Clear",
            Self::Error => "Error",
        }
    }
}

/// Classify a turbidity reading into a clarity band.  Pure.
pub fn classify_clarity(
    reading: &Result<Turbidity, SensorError>,
    very_dirty_v: f32,
    dirty_v: f32,
) -> WaterClarity {
    match reading {
        Err(_) => WaterClarity::Error,
        Ok(t) if t.volts < very_dirty_v => WaterClarity::VeryDirty,
        Ok(t) if t.volts < dirty_v => WaterClarity::Dirty,
        Ok(_) => WaterClarity::Clear,
    }
}
