//! Transport → control loop handoff.
//!
//! Notifications and link-loss reports are produced by the radio stack's
//! callback task, asynchronously to the 1 Hz control loop.  They cross into
//! the loop through a single-slot, overwrite-latest mailbox:
//!
//! ```text
//! ┌──────────────────┐  post_notification  ┌──────────────┐  take_sample   ┌──────────────┐
//! │ GATT notify cb   │────────────────────▶│              │───────────────▶│              │
//! │                  │                     │  LinkMailbox │                │  Control     │
//! │ GATT disconnect  │────────────────────▶│  (1 slot)    │───────────────▶│  loop        │
//! └──────────────────┘  post_disconnect    └──────────────┘ take_link_lost └──────────────┘
//! ```
//!
//! There is no queue: a newer sample replaces an unconsumed older one, and
//! only the latest value is observed by the next tick.  Each field is an
//! independent single-writer/single-reader cell; no invariant spans two of
//! them.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::warn;

use crate::error::PayloadError;
use crate::sensors::heart_rate::{HeartRateSample, SampleFilter, Verdict};

/// Mailbox shared between the transport callbacks and the control loop.
pub struct LinkMailbox {
    /// Latest accepted sample not yet consumed by the loop.
    sample: Signal<CriticalSectionRawMutex, HeartRateSample>,
    /// Most recently accepted bpm (0 = none).  Dedup reference.
    held_bpm: AtomicU8,
    /// Set by the disconnect callback, consumed by the loop.
    link_lost: AtomicBool,
    /// Payloads dropped for being too short.
    rejected_payloads: AtomicU32,
    /// Zero or duplicate readings filtered out.
    filtered_readings: AtomicU32,
    filter: SampleFilter,
}

/// The instance the ESP-IDF GATT callbacks write into.
pub static LINK_MAILBOX: LinkMailbox = LinkMailbox::new();

impl Default for LinkMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkMailbox {
    pub const fn new() -> Self {
        Self {
            sample: Signal::new(),
            held_bpm: AtomicU8::new(0),
            link_lost: AtomicBool::new(false),
            rejected_payloads: AtomicU32::new(0),
            filtered_readings: AtomicU32::new(0),
            filter: SampleFilter::new(),
        }
    }

    // ── Producer side (transport callback context) ────────────

    /// Run a raw measurement notification through the sample filter and,
    /// if accepted, publish it as the pending sample.
    ///
    /// Too-short payloads are reported and counted, never fatal.
    pub fn post_notification(&self, raw: &[u8], now_ms: u64) -> Result<Verdict, PayloadError> {
        let held = self.held_bpm.load(Ordering::Acquire);

        match self.filter.check(raw, held, now_ms) {
            Ok(Verdict::Accepted(sample)) => {
                self.held_bpm.store(sample.bpm, Ordering::Release);
                self.sample.signal(sample);
                Ok(Verdict::Accepted(sample))
            }
            Ok(filtered) => {
                self.filtered_readings.fetch_add(1, Ordering::Relaxed);
                Ok(filtered)
            }
            Err(e) => {
                self.rejected_payloads.fetch_add(1, Ordering::Relaxed);
                warn!("HR | dropped notification: {}", e);
                Err(e)
            }
        }
    }

    /// Report loss of the link.  Drops any in-flight sample so nothing stale
    /// is observed after the transition to Idle.
    pub fn post_disconnect(&self) {
        self.clear_samples();
        self.link_lost.store(true, Ordering::Release);
    }

    // ── Consumer side (control loop) ──────────────────────────

    /// Take the pending sample, if any.  Clears the pending flag.
    pub fn take_sample(&self) -> Option<HeartRateSample> {
        self.sample.try_take()
    }

    /// Whether a sample is waiting to be consumed.
    pub fn has_pending(&self) -> bool {
        self.sample.signaled()
    }

    /// Consume the link-lost flag.
    pub fn take_link_lost(&self) -> bool {
        self.link_lost.swap(false, Ordering::AcqRel)
    }

    /// Drop the pending sample and forget the held value.
    pub fn clear_samples(&self) {
        self.sample.reset();
        self.held_bpm.store(0, Ordering::Release);
    }

    /// Most recently accepted bpm (0 = none since the last clear).
    pub fn held_bpm(&self) -> u8 {
        self.held_bpm.load(Ordering::Acquire)
    }

    pub fn rejected_payloads(&self) -> u32 {
        self.rejected_payloads.load(Ordering::Relaxed)
    }

    pub fn filtered_readings(&self) -> u32 {
        self.filtered_readings.load(Ordering::Relaxed)
    }
}
