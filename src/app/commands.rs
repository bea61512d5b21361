//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (control
//! server, debounced button) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Enter feeding mode; the feed sequence restarts from its first position.
    StartFeeding,

    /// Leave feeding mode; the servo parks at neutral.
    StopFeeding,

    /// Flip the current mode (debounced button path).
    ToggleFeeding,
}
