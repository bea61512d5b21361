//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::WaterStatus;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_mode={:?}", state);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {:?} -> {:?}", from, to);
            }
            AppEvent::StatusReport(s) => {
                info!(
                    "STATUS | mode={:?} | T={} | water={} ({})",
                    s.mode,
                    match s.temperature_c {
                        Some(t) => format!("{t:.1}C"),
                        None => "Error".to_owned(),
                    },
                    match s.distance_cm {
                        Some(d) => format!("{d:.1}cm"),
                        None => "Error".to_owned(),
                    },
                    s.water_status.as_str(),
                );
            }
            AppEvent::WaterAlert {
                status,
                distance_cm,
            } => {
                let distance = match distance_cm {
                    Some(d) => format!("{d:.1}cm"),
                    None => "unknown".to_owned(),
                };
                match status {
                    WaterStatus::Low => {
                        warn!("ALERT | water level LOW ({distance}) - add water to the tank");
                    }
                    WaterStatus::High => {
                        warn!("ALERT | water level HIGH ({distance}) - tank might overflow");
                    }
                    WaterStatus::Error => {
                        warn!("ALERT | water level sensor fault - check trigger/echo wiring");
                    }
                    WaterStatus::Ok => {}
                }
            }
        }
    }
}
