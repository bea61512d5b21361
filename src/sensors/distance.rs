//! HC-SR04 ultrasonic rangefinder driver (water level).
//!
//! Drives a 10 µs trigger pulse, then times the echo pulse with tight
//! microsecond polling.  Both edge waits are bounded; exceeding a bound
//! degrades to a tagged error instead of hanging the loop.
//!
//! This is the single largest blocking call in the system: two expired
//! bounds cost ~60 ms.  The polling cannot yield — a scheduler hop would
//! ruin the µs-level edge timing — so callers budget for the latency.
//!
//! ## Dual-target design
//!
//! The driver is generic over `embedded-hal` digital pins and a
//! [`MonotonicClock`], so host tests drive scripted pins against a fake
//! clock while the device build wires in real GPIO and the ROM timer.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;

/// Round-trip speed of sound at ~20 °C, in cm per µs.
const CM_PER_US: f32 = 0.0343;

/// Microsecond-resolution monotonic time source.
///
/// Values may wrap; consumers must compare with `wrapping_sub`.
pub trait MonotonicClock {
    fn now_us(&self) -> u64;
    /// Busy-wait for `us` microseconds.
    fn delay_us(&self, us: u32);
}

/// HC-SR04 trigger/echo pair plus the clock that times it.
pub struct RangeFinder<Trig, Echo, Clk> {
    trig: Trig,
    echo: Echo,
    clock: Clk,
    timeout_us: u64,
}

impl<Trig, Echo, Clk> RangeFinder<Trig, Echo, Clk>
where
    Trig: OutputPin,
    Echo: InputPin,
    Clk: MonotonicClock,
{
    pub fn new(trig: Trig, echo: Echo, clock: Clk, timeout_us: u64) -> Self {
        Self {
            trig,
            echo,
            clock,
            timeout_us,
        }
    }

    /// Measure the distance to the water surface in centimetres
    /// (one decimal).  Fresh sample on every call — never cached.
    pub fn measure(&mut self) -> Result<f32, SensorError> {
        // 10 µs trigger pulse, preceded by a settle-low.
        self.trig.set_low().map_err(|_| SensorError::GpioFailed)?;
        self.clock.delay_us(2);
        self.trig.set_high().map_err(|_| SensorError::GpioFailed)?;
        self.clock.delay_us(10);
        self.trig.set_low().map_err(|_| SensorError::GpioFailed)?;

        // Wait for the echo to rise (start of pulse).
        let start = self.clock.now_us();
        while !self.echo.is_high().map_err(|_| SensorError::GpioFailed)? {
            if self.clock.now_us().wrapping_sub(start) > self.timeout_us {
                return Err(SensorError::EchoStartTimeout);
            }
        }

        // Time the pulse until it falls.
        let rise = self.clock.now_us();
        while self.echo.is_high().map_err(|_| SensorError::GpioFailed)? {
            if self.clock.now_us().wrapping_sub(rise) > self.timeout_us {
                return Err(SensorError::EchoEndTimeout);
            }
        }
        let pulse_us = self.clock.now_us().wrapping_sub(rise);

        Ok(round1(pulse_us as f32 * CM_PER_US / 2.0))
    }
}

/// Round to one decimal place.
pub(crate) fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use std::rc::Rc;

    const TIMEOUT_US: u64 = 30_000;

    /// Clock that advances one µs per query, so polls make progress.
    #[derive(Clone)]
    struct FakeClock {
        t: Rc<Cell<u64>>,
    }

    impl FakeClock {
        fn new() -> Self {
            Self {
                t: Rc::new(Cell::new(0)),
            }
        }
    }

    impl MonotonicClock for FakeClock {
        fn now_us(&self) -> u64 {
            let now = self.t.get();
            self.t.set(now + 1);
            now
        }

        fn delay_us(&self, us: u32) {
            self.t.set(self.t.get() + u64::from(us));
        }
    }

    struct FakeTrig;

    impl embedded_hal::digital::ErrorType for FakeTrig {
        type Error = Infallible;
    }

    impl OutputPin for FakeTrig {
        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    /// Echo line scripted against the shared fake clock: high while
    /// `rise_at <= t < fall_at`.
    struct FakeEcho {
        t: Rc<Cell<u64>>,
        rise_at: u64,
        fall_at: u64,
    }

    impl embedded_hal::digital::ErrorType for FakeEcho {
        type Error = Infallible;
    }

    impl InputPin for FakeEcho {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let now = self.t.get();
            Ok(now >= self.rise_at && now < self.fall_at)
        }
        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|h| !h)
        }
    }

    fn finder(rise_at: u64, fall_at: u64) -> (RangeFinder<FakeTrig, FakeEcho, FakeClock>, FakeClock) {
        let clock = FakeClock::new();
        let echo = FakeEcho {
            t: clock.t.clone(),
            rise_at,
            fall_at,
        };
        (
            RangeFinder::new(FakeTrig, echo, clock.clone(), TIMEOUT_US),
            clock,
        )
    }

    #[test]
    fn converts_pulse_width_to_centimetres() {
        // ~175 µs pulse -> 175 * 0.0343 / 2 = 3.0 cm.
        let (mut rf, _clock) = finder(100, 100 + 175);
        let d = rf.measure().unwrap();
        assert!((d - 3.0).abs() < 0.1, "got {d}");
    }

    #[test]
    fn long_pulse_reads_far_distance() {
        // ~1458 µs pulse -> ~25 cm.
        let (mut rf, _clock) = finder(50, 50 + 1458);
        let d = rf.measure().unwrap();
        assert!((d - 25.0).abs() < 0.1, "got {d}");
    }

    #[test]
    fn dead_echo_line_times_out() {
        let (mut rf, clock) = finder(u64::MAX, u64::MAX);
        assert_eq!(rf.measure(), Err(SensorError::EchoStartTimeout));
        // Bounded: the fake clock advanced past the bound but not much more.
        assert!(clock.t.get() < TIMEOUT_US + 100);
    }

    #[test]
    fn stuck_high_echo_times_out() {
        let (mut rf, _clock) = finder(0, u64::MAX);
        assert_eq!(rf.measure(), Err(SensorError::EchoEndTimeout));
    }

    #[test]
    fn round1_keeps_one_decimal() {
        assert_eq!(round1(3.04), 3.0);
        assert_eq!(round1(3.06), 3.1);
    }
}
