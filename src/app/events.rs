//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, display refresh).

use crate::control::decision::FanSpeed;
use crate::error::ActuatorError;
use crate::fsm::StateId;

use super::ports::Actuation;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The application service has started (carries initial link state).
    Started(StateId),

    /// The link state machine moved.
    LinkChanged { from: StateId, to: StateId },

    /// A new heart-rate sample was consumed by the control loop.
    HeartRate(u8),

    /// The recommended speed changed (not yet applied).
    DesiredChanged { from: FanSpeed, to: FanSpeed },

    /// An actuation sequence completed.
    FanActuated(Actuation),

    /// An actuation sequence aborted on a GPIO error.
    ActuationFailed {
        target: FanSpeed,
        error: ActuatorError,
    },

    /// Periodic status snapshot.
    Status(StatusSnapshot),
}

/// Read-only view of the controller for the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub link: StateId,
    /// Last heart rate consumed on the current link.
    pub bpm: Option<u8>,
    pub desired: FanSpeed,
    pub applied: FanSpeed,
    /// Time until the dwell gate reopens (0 = open).
    pub dwell_remaining_ms: u64,
    pub rejected_payloads: u32,
    pub connect_attempts: u32,
}
