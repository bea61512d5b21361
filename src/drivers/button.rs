//! Poll-debounced feed button driver.
//!
//! ## Hardware
//!
//! Active-low momentary switch with internal pull-up: idle reads high,
//! a press reads low.  The main loop samples the raw level once per
//! iteration — no ISR, the loop quantum is short enough.
//!
//! ## Debounce
//!
//! Two states: Idle and Pressed.  Only a high→low edge is recognised;
//! it latches a single pending toggle event.  A settle window after the
//! edge swallows contact bounce, and the driver returns to Idle once the
//! line has been released *and* the window has elapsed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Pressed { since_ms: u32 },
}

pub struct FeedButton {
    state: DebounceState,
    last_level_high: bool,
    pending: bool,
    settle_ms: u32,
}

impl FeedButton {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            state: DebounceState::Idle,
            last_level_high: true, // pull-up idle level
            pending: false,
            settle_ms,
        }
    }

    /// Sample the raw input level.  Call once per control-loop iteration
    /// with the current monotonic time in milliseconds.
    pub fn poll(&mut self, raw_high: bool, now_ms: u32) {
        match self.state {
            DebounceState::Idle => {
                if self.last_level_high && !raw_high {
                    self.pending = true;
                    self.state = DebounceState::Pressed { since_ms: now_ms };
                }
            }
            DebounceState::Pressed { since_ms } => {
                // Anything inside the settle window is bounce.
                if raw_high && now_ms.wrapping_sub(since_ms) >= self.settle_ms {
                    self.state = DebounceState::Idle;
                }
            }
        }
        self.last_level_high = raw_high;
    }

    /// Consume the latched press event, if any.  Each recognised press
    /// yields exactly one `true` here.
    pub fn take_pending(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }
}
