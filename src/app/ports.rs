//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (radio, fan line, clock, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::control::decision::FanSpeed;
use crate::error::{ActuatorError, LinkError};

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: radio ↔ domain)
// ───────────────────────────────────────────────────────────────

/// 48-bit device address of a discovered heart-rate sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerAddress(pub [u8; 6]);

impl core::fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let a = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a[0], a[1], a[2], a[3], a[4], a[5]
        )
    }
}

/// Command side of the wireless link.
///
/// Incoming notifications and disconnects do **not** flow through this
/// trait: the radio stack delivers them asynchronously into the
/// [`LinkMailbox`](crate::mailbox::LinkMailbox).
pub trait TransportPort {
    /// Start (or restart) scanning for the heart-rate service.
    /// `reset_results` discards previously seen advertisers.
    fn start_scan(&mut self, reset_results: bool) -> Result<(), LinkError>;

    /// Stop scanning.  Idempotent.
    fn stop_scan(&mut self);

    /// The radio stack refused a scan that `start_scan` had already
    /// accepted.  Reports each such failure once.
    fn take_scan_failure(&mut self) -> bool;

    /// An advertiser of the target service seen since the last call.
    fn take_discovered(&mut self) -> Option<PeerAddress>;

    /// Open a connection and resolve the measurement characteristic.
    fn connect(&mut self, peer: PeerAddress) -> Result<(), LinkError>;

    /// Subscribe to measurement notifications on the open connection.
    fn enable_notifications(&mut self) -> Result<(), LinkError>;

    /// Tear the connection down.  Idempotent.
    fn disconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → fan line)
// ───────────────────────────────────────────────────────────────

/// Result of one completed actuation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actuation {
    pub from: FanSpeed,
    pub to: FanSpeed,
    /// Short presses issued after the off-hold.
    pub presses: u8,
}

/// Write-side port for the fan.
pub trait ActuatorPort {
    /// Speed the fan was last physically set to.
    fn applied_speed(&self) -> FanSpeed;

    /// Blocking: run the full actuation sequence for `target`.
    ///
    /// On error the applied speed is left unchanged.
    fn apply_speed(&mut self, target: FanSpeed) -> Result<Actuation, ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / display)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
