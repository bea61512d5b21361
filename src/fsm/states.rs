//! Concrete state handler functions and table builder.
//!
//! Two states, no sensor-driven transitions:
//!
//! ```text
//!  NORMAL ──[button toggle / GET /feed]──▶ FEEDING
//!    ▲                                        │
//!    └───────[button toggle / GET /stop]──────┘
//! ```
//!
//! Both transitions are forced from outside the FSM (debounced button or
//! network command); `on_update` only performs the per-tick work of the
//! current state.  Entering `Feeding` rewinds the feed sequence to the
//! first position; entering `Normal` parks the servo at neutral — so the
//! reset side effects of a mode change live in exactly one place.

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Normal
        StateDescriptor {
            id: StateId::Normal,
            name: "Normal",
            on_enter: Some(normal_enter),
            on_exit: None,
            on_update: normal_update,
        },
        // Index 1 — Feeding
        StateDescriptor {
            id: StateId::Feeding,
            name: "Feeding",
            on_enter: Some(feeding_enter),
            on_exit: None,
            on_update: feeding_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL state — monitoring, servo parked
// ═══════════════════════════════════════════════════════════════════════════

fn normal_enter(ctx: &mut FsmContext) {
    ctx.stepper.reset_neutral();
    ctx.commands.servo_duty = ctx.stepper.neutral_duty();
    info!("NORMAL: servo parked at neutral (90 deg)");
}

fn normal_update(_ctx: &mut FsmContext) -> Option<StateId> {
    // Mode changes arrive via force_transition; nothing to do per tick.
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FEEDING state — servo cycling through the feed positions
// ═══════════════════════════════════════════════════════════════════════════

fn feeding_enter(ctx: &mut FsmContext) {
    ctx.stepper.rewind();
    info!("FEEDING: cycling 0 -> 45 -> 90 -> 135 -> 180 deg, repeating");
}

fn feeding_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.commands.servo_duty = ctx.stepper.advance();
    None
}
