//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to: the feed-sequence position, the actuator command output,
//! timing counters, and configuration.  Think of it as the "blackboard"
//! in a blackboard architecture — handlers mutate it, the service
//! applies it to hardware after each tick.

use crate::config::SystemConfig;
use crate::drivers::servo::{FeedStepper, NEUTRAL_DUTY};

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Commands that state handlers write to request actuator actions.
/// Applied to the servo driver after every tick — writes are
/// fire-and-forget, so re-applying an unchanged duty is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommands {
    /// Servo duty count to hold this tick.
    pub servo_duty: u16,
}

impl Default for ActuatorCommands {
    fn default() -> Self {
        Self {
            servo_duty: NEUTRAL_DUTY,
        }
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Feed sequence --
    /// Position sequencer for the feed servo.
    pub stepper: FeedStepper,

    // -- Actuator outputs --
    /// Commands to be applied to actuators after the FSM tick.
    pub commands: ActuatorCommands,

    // -- Configuration --
    /// System configuration (tunable parameters).
    pub config: SystemConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.  The stepper
    /// starts parked at neutral, matching the startup servo position.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            stepper: FeedStepper::new(),
            commands: ActuatorCommands::default(),
            config,
        }
    }
}
