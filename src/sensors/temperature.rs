//! DS18B20 water temperature probe.
//!
//! The 1-Wire transaction is a black box behind [`TemperatureProbe::read`]:
//! it either yields a Celsius value or a tagged failure.  Missing probe,
//! failed presence pulse, and CRC mismatch all degrade the same way —
//! the loop never aborts over a temperature read.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: runs the bit-banged transaction in `drivers::onewire`.
//! On host/test: reads an injected simulation value.

use crate::error::SensorError;
use crate::sensors::distance::round1;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Simulated reading in milli-degrees Celsius.
#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_MC: AtomicI32 = AtomicI32::new(25_000);
#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_PRESENT: AtomicBool = AtomicBool::new(true);

/// Inject a probe reading for host tests.  `None` simulates a missing
/// or failing probe.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temperature(celsius: Option<f32>) {
    match celsius {
        Some(c) => {
            SIM_TEMP_MC.store((c * 1000.0) as i32, Ordering::Relaxed);
            SIM_TEMP_PRESENT.store(true, Ordering::Relaxed);
        }
        None => SIM_TEMP_PRESENT.store(false, Ordering::Relaxed),
    }
}

pub struct TemperatureProbe {
    dq_gpio: i32,
}

impl TemperatureProbe {
    pub fn new(dq_gpio: i32) -> Self {
        Self { dq_gpio }
    }

    /// Read the water temperature in Celsius, one decimal.
    pub fn read(&mut self) -> Result<f32, SensorError> {
        self.read_raw().map(round1)
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> Result<f32, SensorError> {
        crate::drivers::onewire::read_celsius(self.dq_gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> Result<f32, SensorError> {
        let _ = self.dq_gpio;
        if !SIM_TEMP_PRESENT.load(Ordering::Relaxed) {
            return Err(SensorError::BusFailed);
        }
        Ok(SIM_TEMP_MC.load(Ordering::Relaxed) as f32 / 1000.0)
    }
}
