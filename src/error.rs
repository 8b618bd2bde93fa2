//! Unified error types for the HrFan firmware.
//!
//! Every subsystem error converts into the top-level [`Error`], keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can cross the transport callback boundary and sit in `AppEvent`s without
//! allocation.
//!
//! None of these are fatal: the control loop logs them and keeps the system
//! in a safe state.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A heart-rate notification payload was malformed.
    Payload(PayloadError),
    /// The wireless link could not be brought up.
    Link(LinkError),
    /// The fan control line could not be driven.
    Actuator(ActuatorError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload(e) => write!(f, "payload: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload does not reach the bpm field (byte 1).
    TooShort { len: usize },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => write!(f, "notification too short ({len} bytes)"),
        }
    }
}

impl From<PayloadError> for Error {
    fn from(e: PayloadError) -> Self {
        Self::Payload(e)
    }
}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The scan could not be started.
    ScanStartFailed,
    /// Opening the connection to the discovered sensor failed.
    ConnectFailed,
    /// The sensor does not expose the measurement characteristic.
    CharacteristicMissing,
    /// Writing the notification-enable descriptor failed.
    NotifyArmFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScanStartFailed => write!(f, "scan start failed"),
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::CharacteristicMissing => write!(f, "measurement characteristic missing"),
            Self::NotifyArmFailed => write!(f, "notification arming failed"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Setting the control line level failed.
    GpioWriteFailed(embedded_hal::digital::ErrorKind),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed(kind) => write!(f, "GPIO write failed ({kind})"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
