//! Feed servo driver (SG90-class positional servo on LEDC PWM).
//!
//! Feeding cycles the horn through five fixed positions; each full
//! revolution of the sequence drops one portion of food.  The neutral
//! 90° position closes the hopper.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC servo channel via hw_init.
//! On host/test: tracks the last commanded duty in-memory only.

use crate::drivers::hw_init;

/// Duty counts for the five feed positions (14-bit LEDC @ 50 Hz;
/// 0.5 ms – 2.5 ms pulse width).
pub const FEED_POSITIONS: [(u16, &str); 5] = [
    (410, "0 deg"),
    (819, "45 deg"),
    (1229, "90 deg"),
    (1638, "135 deg"),
    (2048, "180 deg"),
];

/// Index of the neutral (hopper-closed) position in [`FEED_POSITIONS`].
pub const NEUTRAL_STEP: usize = 2;

/// Duty count for the neutral position.
pub const NEUTRAL_DUTY: u16 = FEED_POSITIONS[NEUTRAL_STEP].0;

// ---------------------------------------------------------------------------
// Position sequencer (pure state, no hardware)
// ---------------------------------------------------------------------------

/// Tracks the servo's place in the feed sequence.
///
/// Invariant: the step index is always in `[0, FEED_POSITIONS.len())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedStepper {
    step: usize,
}

impl FeedStepper {
    /// Start parked at the neutral position.
    pub fn new() -> Self {
        Self { step: NEUTRAL_STEP }
    }

    /// Rewind to the first position, ready for a fresh feed cycle.
    pub fn rewind(&mut self) {
        self.step = 0;
    }

    /// Park at the neutral position without emitting anything.
    pub fn reset_neutral(&mut self) {
        self.step = NEUTRAL_STEP;
    }

    /// Duty for the current position, then move the sequence forward
    /// one step (wrapping after the last position).
    pub fn advance(&mut self) -> u16 {
        let (duty, angle) = FEED_POSITIONS[self.step];
        log::debug!("servo step {} -> {}", self.step, angle);
        self.step = (self.step + 1) % FEED_POSITIONS.len();
        duty
    }

    /// Duty for the neutral position.
    pub fn neutral_duty(&self) -> u16 {
        NEUTRAL_DUTY
    }

    /// Current step index.
    pub fn step(&self) -> usize {
        self.step
    }
}

// ---------------------------------------------------------------------------
// Hardware emission
// ---------------------------------------------------------------------------

/// Writes duty counts to the LEDC servo channel.  Writes are
/// fire-and-forget; there is no error path.
pub struct ServoDriver {
    last_duty: u16,
}

impl ServoDriver {
    pub fn new() -> Self {
        Self { last_duty: 0 }
    }

    pub fn set_duty(&mut self, duty: u16) {
        hw_init::ledc_set(hw_init::LEDC_CH_SERVO, duty as u32);
        self.last_duty = duty;
    }

    /// Last duty count commanded to the hardware.
    pub fn last_duty(&self) -> u16 {
        self.last_duty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_neutral() {
        let s = FeedStepper::new();
        assert_eq!(s.step(), NEUTRAL_STEP);
    }

    #[test]
    fn advance_emits_then_increments() {
        let mut s = FeedStepper::new();
        s.rewind();
        assert_eq!(s.advance(), FEED_POSITIONS[0].0);
        assert_eq!(s.step(), 1);
    }

    #[test]
    fn five_advances_complete_a_cycle() {
        let mut s = FeedStepper::new();
        s.rewind();
        let start = s.step();
        for _ in 0..FEED_POSITIONS.len() {
            s.advance();
        }
        assert_eq!(s.step(), start);
    }

    #[test]
    fn step_always_in_range() {
        let mut s = FeedStepper::new();
        for _ in 0..37 {
            s.advance();
            assert!(s.step() < FEED_POSITIONS.len());
        }
    }

    #[test]
    fn reset_neutral_points_at_90_degrees() {
        let mut s = FeedStepper::new();
        s.rewind();
        s.advance();
        s.reset_neutral();
        assert_eq!(s.step(), NEUTRAL_STEP);
        assert_eq!(s.neutral_duty(), FEED_POSITIONS[NEUTRAL_STEP].0);
    }

    #[test]
    fn servo_driver_tracks_last_duty() {
        let mut d = ServoDriver::new();
        d.set_duty(NEUTRAL_DUTY);
        assert_eq!(d.last_duty(), NEUTRAL_DUTY);
    }
}
