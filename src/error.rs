//! Unified error types for the AquaFeeder firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling uniform.
//! Sensor failures carry a tagged reason rather than collapsing into one
//! sentinel, so a timeout is distinguishable from a wiring fault in the log
//! while the "never abort" policy stays intact.  All variants are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// The control server failed at the socket layer.
    Server(ServerError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Server(e) => write!(f, "server: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Tagged reasons a sensor read can fail.  Readings degrade to these —
/// they are reported, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Echo line never rose within the poll bound — nothing in range or
    /// a trigger/echo wiring fault.
    EchoStartTimeout,
    /// Echo pulse never ended within the poll bound.
    EchoEndTimeout,
    /// GPIO read or write returned an error.
    GpioFailed,
    /// ADC sample could not be taken.
    AdcReadFailed,
    /// 1-Wire device missing, or the bus transaction failed its check.
    BusFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EchoStartTimeout => write!(f, "echo start timeout"),
            Self::EchoEndTimeout => write!(f, "echo end timeout"),
            Self::GpioFailed => write!(f, "GPIO access failed"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::BusFailed => write!(f, "1-Wire transaction failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Control server errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerError {
    /// The listening socket could not be bound.
    BindFailed,
    /// `accept()` failed for a reason other than would-block.
    AcceptFailed,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed => write!(f, "listener bind failed"),
            Self::AcceptFailed => write!(f, "accept failed"),
        }
    }
}

impl From<ServerError> for Error {
    fn from(e: ServerError) -> Self {
        Self::Server(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
