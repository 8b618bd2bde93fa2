//! Heart-rate measurement parsing and sample filtering.
//!
//! ## Payload layout
//!
//! ```text
//! ┌────────┬──────────┬───────────────────────┐
//! │ byte 0 │ byte 1   │ byte 2..              │
//! │ flags  │ bpm (u8) │ ignored (RR, energy)  │
//! └────────┴──────────┴───────────────────────┘
//! ```
//!
//! The flags byte is not interpreted: the sensor is assumed to report an
//! 8-bit bpm value.
//!
//! ## Filtering
//!
//! | Reading                  | Outcome                        |
//! |--------------------------|--------------------------------|
//! | payload < 2 bytes        | `Err(PayloadError::TooShort)`  |
//! | bpm == 0 (skin contact lost) | `Filtered::Zero`           |
//! | bpm == currently held    | `Filtered::Duplicate`          |
//! | anything else            | `Accepted(sample)`             |

use crate::error::PayloadError;

/// Byte offset of the beats-per-minute value.
const BPM_OFFSET: usize = 1;

/// One accepted heart-rate reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartRateSample {
    pub bpm: u8,
    /// Monotonic milliseconds at which the notification arrived.
    pub valid_at_ms: u64,
}

/// Why a well-formed reading was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filtered {
    Zero,
    Duplicate,
}

/// Result of running one notification through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted(HeartRateSample),
    Filtered(Filtered),
}

/// Extract the bpm field from a raw measurement notification.
pub fn parse_bpm(raw: &[u8]) -> Result<u8, PayloadError> {
    raw.get(BPM_OFFSET)
        .copied()
        .ok_or(PayloadError::TooShort { len: raw.len() })
}

/// Stateless filter: the currently held value is passed in by the owner of
/// the shared cell, so the filter itself never races with the reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleFilter;

impl SampleFilter {
    pub const fn new() -> Self {
        Self
    }

    /// Validate `raw` against the currently held bpm (`0` = nothing held).
    pub fn check(&self, raw: &[u8], held_bpm: u8, now_ms: u64) -> Result<Verdict, PayloadError> {
        let bpm = parse_bpm(raw)?;

        if bpm == 0 {
            return Ok(Verdict::Filtered(Filtered::Zero));
        }
        if bpm == held_bpm {
            return Ok(Verdict::Filtered(Filtered::Duplicate));
        }

        Ok(Verdict::Accepted(HeartRateSample {
            bpm,
            valid_at_ms: now_ms,
        }))
    }
}
