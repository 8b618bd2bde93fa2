//! Shared mutable context threaded through every link FSM handler.
//!
//! The application service fills [`LinkInputs`] from the transport and the
//! mailbox before each tick; handlers consume them and leave
//! [`LinkCommands`] behind for the service to apply.

use crate::error::LinkError;

// ---------------------------------------------------------------------------
// Inputs (written by the service; consumed by handlers)
// ---------------------------------------------------------------------------

/// Everything the transport reported since the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkInputs {
    /// Result of the connect + arm handshake attempted this tick, if the
    /// transport reported the target service.
    pub connect_outcome: Option<Result<(), LinkError>>,
    /// The scan could not be (re)started.
    pub scan_failed: bool,
    /// The disconnect callback fired.
    pub link_lost: bool,
}

impl LinkInputs {
    /// Consume all inputs, leaving defaults behind.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}

// ---------------------------------------------------------------------------
// Commands (written by handlers; applied by the service)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCommands {
    /// Start a scan with previous results discarded.
    pub start_scan: bool,
    /// Drop any in-flight heart-rate sample state.
    pub flush_samples: bool,
}

impl LinkCommands {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// LinkContext
// ---------------------------------------------------------------------------

pub struct LinkContext {
    pub inputs: LinkInputs,
    pub commands: LinkCommands,

    // -- Bookkeeping --
    /// A failed attempt left the scanner stopped; restart it next tick.
    pub rescan_pending: bool,
    /// Connect handshakes attempted since boot.
    pub connect_attempts: u32,
    /// Connect handshakes that failed since boot.
    pub failed_connects: u32,
}

impl Default for LinkContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkContext {
    pub fn new() -> Self {
        Self {
            inputs: LinkInputs::default(),
            commands: LinkCommands::default(),
            rescan_pending: false,
            connect_attempts: 0,
            failed_connects: 0,
        }
    }
}
