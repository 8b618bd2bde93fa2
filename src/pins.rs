//! GPIO / peripheral pin assignments for the HrFan board.
//!
//! Single source of truth — drivers and `main` reference this module rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Fan control line
// ---------------------------------------------------------------------------

/// Digital output wired across the fan's mode button (via an NPN transistor).
/// Exclusively driven by the fan actuator.
pub const FAN_BUTTON_GPIO: i32 = 25;

