//! Fan mode-button driver.
//!
//! The fan has a single mode button wired through a transistor to one GPIO.
//! Its internal controller understands two gestures:
//!
//! | Gesture     | Effect                                          |
//! |-------------|-------------------------------------------------|
//! | Long hold   | power off (hold > long-press threshold)          |
//! | Short press | from off: power on at High; then High→Med→Low→… |
//!
//! A speed change therefore always resets to Off first, then counts up:
//!
//! ```text
//!  line  ▔▔▔▔▔▔▔▔▔▔▔▔▔▔╲_____╱▔▔▔╲___╱▔▔▔╲___╱▔▔▔╲___
//!        │◀─ off_hold ─▶│ rel │press│rel│press│rel│press│rel
//!        (pressed = ▔)            ×1 High, ×2 Med, ×3 Low
//! ```
//!
//! The sequence blocks the caller for its full duration.  That is the one
//! place in the control loop where multi-second blocking is expected: the
//! fan only recognises the gestures if the timing is exact and unbroken.
//!
//! The line is owned exclusively by this driver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};
use embassy_time::Duration;
use log::{info, warn};

use crate::app::ports::{Actuation, ActuatorPort};
use crate::config::ControllerConfig;
use crate::control::decision::FanSpeed;
use crate::error::ActuatorError;

/// Pulse timings of the fan button protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTiming {
    pub off_hold: Duration,
    pub press: Duration,
    pub release: Duration,
}

impl PulseTiming {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            off_hold: Duration::from_millis(config.off_hold_ms as u64),
            press: Duration::from_millis(config.press_ms as u64),
            release: Duration::from_millis(config.release_ms as u64),
        }
    }

    /// Total blocking time of a sequence ending at `target`.
    pub fn sequence_duration(&self, target: FanSpeed) -> Duration {
        let pair = self.press + self.release;
        let mut total = self.off_hold + self.release;
        for _ in 0..press_count(target) {
            total += pair;
        }
        total
    }
}

/// Short presses needed after a power-off to land on `target`.
///
/// The count depends only on the target, never on the current speed.
pub const fn press_count(target: FanSpeed) -> u8 {
    match target {
        FanSpeed::Off => 0,
        FanSpeed::High => 1,
        FanSpeed::Med => 2,
        FanSpeed::Low => 3,
    }
}

pub struct FanButton<P, D> {
    pin: P,
    delay: D,
    timing: PulseTiming,
    active_low: bool,
    /// Speed the fan was last physically set to (AppliedSpeed).
    applied: FanSpeed,
}

impl<P: OutputPin, D: DelayNs> FanButton<P, D> {
    /// Take ownership of the control line and leave it released.
    pub fn new(
        pin: P,
        delay: D,
        timing: PulseTiming,
        active_low: bool,
    ) -> Result<Self, ActuatorError> {
        let mut button = Self {
            pin,
            delay,
            timing,
            active_low,
            applied: FanSpeed::Off,
        };
        button.set_pressed(false)?;
        Ok(button)
    }

    pub fn timing(&self) -> PulseTiming {
        self.timing
    }

    /// Run the full off-then-count-up sequence for `target`.
    fn run_sequence(&mut self, target: FanSpeed) -> Result<u8, ActuatorError> {
        // 1. Long hold → fan powers off.
        self.hold(true, self.timing.off_hold)?;
        self.hold(false, self.timing.release)?;

        // 2. Count up from the power-on default.
        let presses = press_count(target);
        for _ in 0..presses {
            self.hold(true, self.timing.press)?;
            self.hold(false, self.timing.release)?;
        }
        Ok(presses)
    }

    fn hold(&mut self, pressed: bool, duration: Duration) -> Result<(), ActuatorError> {
        self.set_pressed(pressed)?;
        self.delay.delay_ms(duration.as_millis() as u32);
        Ok(())
    }

    fn set_pressed(&mut self, pressed: bool) -> Result<(), ActuatorError> {
        let high = pressed != self.active_low;
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|e| ActuatorError::GpioWriteFailed(e.kind()))
    }
}

impl<P: OutputPin, D: DelayNs> ActuatorPort for FanButton<P, D> {
    fn applied_speed(&self) -> FanSpeed {
        self.applied
    }

    fn apply_speed(&mut self, target: FanSpeed) -> Result<Actuation, ActuatorError> {
        let from = self.applied;
        info!(
            "FAN: {} -> {} ({} presses after off-hold)",
            from.name(),
            target.name(),
            press_count(target)
        );

        match self.run_sequence(target) {
            Ok(presses) => {
                self.applied = target;
                Ok(Actuation {
                    from,
                    to: target,
                    presses,
                })
            }
            Err(e) => {
                // Never leave the button held down.
                if self.set_pressed(false).is_err() {
                    warn!("FAN: could not release control line after failure");
                }
                Err(e)
            }
        }
    }
}
