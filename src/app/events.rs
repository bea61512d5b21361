//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — today they go to the serial log.

use crate::fsm::StateId;
use crate::sensors::WaterStatus;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The application service has started (carries initial mode).
    Started(StateId),

    /// The feeding mode changed.
    ModeChanged { from: StateId, to: StateId },

    /// Periodic status summary (every `status_report_every` iterations).
    StatusReport(StatusData),

    /// Water level left the OK band (checked every `alert_check_every`
    /// iterations).
    WaterAlert {
        status: WaterStatus,
        distance_cm: Option<f32>,
    },
}

/// A point-in-time status summary suitable for logging.
#[derive(Debug, Clone, Copy)]
pub struct StatusData {
    pub mode: StateId,
    pub temperature_c: Option<f32>,
    pub distance_cm: Option<f32>,
    pub water_status: WaterStatus,
}
