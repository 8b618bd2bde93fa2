//! Status-line formatting for the on-board display.
//!
//! Rendering itself belongs to the display driver; this module only turns a
//! [`StatusSnapshot`] into three fixed-width lines:
//!
//! ```text
//! BT: Connected
//! HR: 135 bpm
//! FAN: Off -> High 12s
//! ```

use core::fmt::Write;

use crate::app::events::StatusSnapshot;
use crate::fsm::StateId;

/// Characters per display line.
pub const LINE_WIDTH: usize = 21;

pub type StatusLine = heapless::String<LINE_WIDTH>;

/// Format `status` into link, heart-rate and fan lines.
///
/// Output that does not fit a line is cut off.
pub fn status_lines(status: &StatusSnapshot) -> [StatusLine; 3] {
    let mut link = StatusLine::new();
    let mut hr = StatusLine::new();
    let mut fan = StatusLine::new();

    let link_text = match status.link {
        StateId::Idle => "Idle",
        StateId::Scanning => "Scanning...",
        StateId::Connected => "Connected",
    };
    let _ = write!(link, "BT: {}", link_text);

    let _ = match status.bpm {
        Some(bpm) => write!(hr, "HR: {} bpm", bpm),
        None => write!(hr, "HR: --"),
    };

    let _ = if status.desired == status.applied {
        write!(fan, "FAN: {}", status.applied.name())
    } else {
        // Pending change: show when the dwell gate opens.
        let secs = status.dwell_remaining_ms.div_ceil(1_000);
        write!(
            fan,
            "FAN: {} -> {} {}s",
            status.applied.name(),
            status.desired.name(),
            secs
        )
    };

    [link, hr, fan]
}
