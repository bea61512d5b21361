//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the servo driver, exposing them through
//! [`SensorPort`] and [`ActuatorPort`].  This is the only module in the
//! system that touches actual hardware.  On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::SystemConfig;
use crate::drivers::hw_init;
use crate::drivers::servo::ServoDriver;
use crate::pins;
use crate::sensors::distance::RangeFinder;
use crate::sensors::temperature::TemperatureProbe;
use crate::sensors::turbidity::TurbiditySensor;
use crate::sensors::{SensorHub, SensorSnapshot};

use super::time::SystemClock;

// ── embedded-hal pin wrappers over the raw GPIO helpers ───────

/// HC-SR04 trigger line.
pub struct TrigPin;

impl ErrorType for TrigPin {
    type Error = Infallible;
}

impl OutputPin for TrigPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(pins::TRIG_GPIO, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(pins::TRIG_GPIO, true);
        Ok(())
    }
}

/// HC-SR04 echo line.
pub struct EchoPin;

impl ErrorType for EchoPin {
    type Error = Infallible;
}

impl InputPin for EchoPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(hw_init::gpio_read(pins::ECHO_GPIO))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|h| !h)
    }
}

// ── Adapter ───────────────────────────────────────────────────

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    hub: SensorHub<TrigPin, EchoPin, SystemClock>,
    servo: ServoDriver,
    clock: SystemClock,
}

impl HardwareAdapter {
    pub fn new(config: &SystemConfig) -> Self {
        let clock = SystemClock::new();
        let range = RangeFinder::new(TrigPin, EchoPin, clock, config.echo_timeout_us);
        let hub = SensorHub::new(
            range,
            TemperatureProbe::new(pins::ONEWIRE_GPIO),
            TurbiditySensor::new(pins::TURBIDITY_ADC_GPIO),
            config.water_high_cm,
            config.water_low_cm,
            config.turbidity_very_dirty_v,
            config.turbidity_dirty_v,
        );

        Self {
            hub,
            servo: ServoDriver::new(),
            clock,
        }
    }

    /// Last duty count commanded to the servo.
    pub fn servo_duty(&self) -> u16 {
        self.servo.last_duty()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_all(&mut self) -> SensorSnapshot {
        self.hub
            .read_all(self.clock.time_of_day(), self.clock.date_string())
    }

    fn button_level_high(&mut self) -> bool {
        hw_init::gpio_read(pins::BUTTON_GPIO)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_servo_duty(&mut self, duty: u16) {
        self.servo.set_duty(duty);
    }
}
