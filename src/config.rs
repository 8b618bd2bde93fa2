//! Controller configuration parameters
//!
//! Every tunable constant of the heart-rate → fan pipeline lives here.
//! The defaults are the production values; there is no persisted or remote
//! configuration, the struct is built once at startup.

use serde::{Deserialize, Serialize};

/// The fan's own controller treats a button hold longer than this as
/// "power off".  The off-hold pulse must exceed it.
pub const FAN_LONG_PRESS_THRESHOLD_MS: u32 = 2_000;

/// Upper bound on any single pulse (hold, press or release) in ms.
pub const MAX_PULSE_MS: u32 = 10_000;

/// Bluetooth SIG Heart Rate service.
pub const HEART_RATE_SERVICE_UUID: u16 = 0x180D;
/// Bluetooth SIG Heart Rate Measurement characteristic.
pub const HEART_RATE_MEASUREMENT_UUID: u16 = 0x2A37;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Heart-rate bands (strictly greater-than) ---
    /// bpm above which the fan runs High
    pub high_above_bpm: u8,
    /// bpm above which the fan runs Med
    pub med_above_bpm: u8,
    /// bpm above which the fan runs Low
    pub low_above_bpm: u8,

    // --- Actuation ---
    /// Minimum time between the end of one actuation and the start of the next (ms)
    pub min_dwell_ms: u32,
    /// Hold duration of the power-off pulse (ms)
    pub off_hold_ms: u32,
    /// Pressed duration of one short press (ms)
    pub press_ms: u32,
    /// Released duration after one short press (ms)
    pub release_ms: u32,
    /// Control line level meaning "pressed": false = HIGH, true = LOW
    pub button_active_low: bool,

    // --- Timing ---
    /// Scheduling loop cadence (ms)
    pub tick_interval_ms: u32,
    /// Emit a status event every N ticks
    pub status_interval_ticks: u32,

    // --- Sensor ---
    /// Advertised service the scanner looks for
    pub service_uuid: u16,
    /// Characteristic whose notifications carry the bpm payload
    pub measurement_uuid: u16,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Bands
            high_above_bpm: 130,
            med_above_bpm: 115,
            low_above_bpm: 100,

            // Actuation
            min_dwell_ms: 15_000,
            off_hold_ms: 3_000,
            press_ms: 250,
            release_ms: 250,
            button_active_low: false,

            // Timing
            tick_interval_ms: 1_000, // 1 Hz
            status_interval_ticks: 10,

            // Sensor
            service_uuid: HEART_RATE_SERVICE_UUID,
            measurement_uuid: HEART_RATE_MEASUREMENT_UUID,
        }
    }
}

impl ControllerConfig {
    /// Reject values that would break the band ordering or the fan protocol.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        use crate::error::Error;

        if !(self.high_above_bpm > self.med_above_bpm && self.med_above_bpm > self.low_above_bpm) {
            return Err(Error::Config("bpm thresholds must be strictly descending"));
        }
        if self.off_hold_ms <= FAN_LONG_PRESS_THRESHOLD_MS {
            return Err(Error::Config("off-hold must exceed the fan long-press threshold"));
        }
        if self.press_ms == 0 || self.release_ms == 0 {
            return Err(Error::Config("press/release pulses must be non-zero"));
        }
        if self.off_hold_ms > MAX_PULSE_MS || self.release_ms > MAX_PULSE_MS {
            return Err(Error::Config("pulse longer than the 10 s limit"));
        }
        if self.press_ms >= FAN_LONG_PRESS_THRESHOLD_MS {
            return Err(Error::Config("short press would register as a long press"));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick interval must be non-zero"));
        }
        Ok(())
    }

    /// Worst-case duration of one blocking actuation sequence (ms):
    /// off-hold, its release gap, then three press/release pairs.
    pub fn longest_actuation_ms(&self) -> u32 {
        let pair = self.press_ms.saturating_add(self.release_ms);
        self.off_hold_ms
            .saturating_add(self.release_ms)
            .saturating_add(pair.saturating_mul(3))
    }
}
