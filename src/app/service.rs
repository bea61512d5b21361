//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the mode FSM and its shared context.  It exposes
//! a clean, hardware-agnostic API; all I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService       │
//! ActuatorPort ◀──│  mode FSM · cadence    │──▶ DisplayPort
//!                 └────────────────────────┘
//! ```

use log::info;

use crate::config::SystemConfig;
use crate::display;
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::sensors::WaterStatus;

use super::commands::AppCommand;
use super::events::{AppEvent, StatusData};
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    tick_count: u64,
    status_every: u64,
    alert_every: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let status_every = u64::from(config.status_report_every.max(1));
        let alert_every = u64::from(config.alert_check_every.max(1));
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Normal);

        Self {
            fsm,
            ctx,
            tick_count: 0,
            status_every,
            alert_every,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Normal mode and park the servo.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        self.apply_actuators(hw);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: read sensors → render display →
    /// FSM tick → apply actuators → periodic status/alert events.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        panel: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Fresh snapshot via SensorPort — never reused across ticks.
        let snapshot = hw.read_all();

        // 2. Render the screen for the current mode.
        match self.fsm.current_state() {
            StateId::Feeding => display::render_feeding(&snapshot, panel),
            StateId::Normal => display::render_normal(&snapshot, panel),
        }

        // 3. FSM tick (advances the feed sequence while feeding).
        self.fsm.tick(&mut self.ctx);

        // 4. Apply actuator commands via ActuatorPort.
        self.apply_actuators(hw);

        // 5. Periodic summaries and alerts.
        if self.tick_count % self.status_every == 0 {
            sink.emit(&AppEvent::StatusReport(StatusData {
                mode: self.fsm.current_state(),
                temperature_c: snapshot.temperature_c.ok(),
                distance_cm: snapshot.distance_cm.ok(),
                water_status: snapshot.water_status,
            }));
        }
        if self.tick_count % self.alert_every == 0
            && snapshot.water_status != WaterStatus::Ok
        {
            sink.emit(&AppEvent::WaterAlert {
                status: snapshot.water_status,
                distance_cm: snapshot.distance_cm.ok(),
            });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (button or control server).
    ///
    /// The servo duty is re-applied even when the mode does not change,
    /// so a repeated stop re-asserts the neutral position — commands are
    /// idempotent in their observable effect.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let target = match cmd {
            AppCommand::StartFeeding => StateId::Feeding,
            AppCommand::StopFeeding => StateId::Normal,
            AppCommand::ToggleFeeding => match self.fsm.current_state() {
                StateId::Normal => StateId::Feeding,
                StateId::Feeding => StateId::Normal,
            },
        };

        let prev = self.fsm.current_state();
        if prev != target {
            self.fsm.force_transition(target, &mut self.ctx);
            sink.emit(&AppEvent::ModeChanged { from: prev, to: target });
        }
        self.apply_actuators(hw);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current mode.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// True while the feed sequence is cycling.
    pub fn is_feeding(&self) -> bool {
        self.fsm.current_state() == StateId::Feeding
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Current feed-sequence step index (always in [0, 5)).
    pub fn servo_step(&self) -> usize {
        self.ctx.stepper.step()
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.ctx.config.clone()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate FSM actuator commands into port calls.
    fn apply_actuators(&self, hw: &mut impl ActuatorPort) {
        hw.set_servo_duty(self.ctx.commands.servo_duty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::servo::{NEUTRAL_DUTY, NEUTRAL_STEP};

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    struct DutyLog {
        duties: Vec<u16>,
    }
    impl ActuatorPort for DutyLog {
        fn set_servo_duty(&mut self, duty: u16) {
            self.duties.push(duty);
        }
    }

    #[test]
    fn start_parks_servo_at_neutral() {
        let mut app = AppService::new(SystemConfig::default());
        let mut hw = DutyLog { duties: Vec::new() };
        let mut sink = NullSink;
        app.start(&mut hw, &mut sink);
        assert_eq!(hw.duties.last(), Some(&NEUTRAL_DUTY));
        assert_eq!(app.servo_step(), NEUTRAL_STEP);
    }

    #[test]
    fn stop_twice_is_idempotent() {
        let mut app = AppService::new(SystemConfig::default());
        let mut hw = DutyLog { duties: Vec::new() };
        let mut sink = NullSink;
        app.start(&mut hw, &mut sink);

        app.handle_command(AppCommand::StartFeeding, &mut hw, &mut sink);
        app.handle_command(AppCommand::StopFeeding, &mut hw, &mut sink);
        let step_after_first = app.servo_step();
        let duty_after_first = *hw.duties.last().unwrap();

        app.handle_command(AppCommand::StopFeeding, &mut hw, &mut sink);
        assert_eq!(app.servo_step(), step_after_first);
        assert_eq!(*hw.duties.last().unwrap(), duty_after_first);
        assert_eq!(duty_after_first, NEUTRAL_DUTY);
        assert!(!app.is_feeding());
    }

    #[test]
    fn toggle_flips_mode() {
        let mut app = AppService::new(SystemConfig::default());
        let mut hw = DutyLog { duties: Vec::new() };
        let mut sink = NullSink;
        app.start(&mut hw, &mut sink);

        app.handle_command(AppCommand::ToggleFeeding, &mut hw, &mut sink);
        assert!(app.is_feeding());
        app.handle_command(AppCommand::ToggleFeeding, &mut hw, &mut sink);
        assert!(!app.is_feeding());
    }
}
