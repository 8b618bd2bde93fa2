//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | link={}", state.name());
            }
            AppEvent::LinkChanged { from, to } => {
                info!("LINK | {} -> {}", from.name(), to.name());
            }
            AppEvent::HeartRate(bpm) => {
                info!("HR | {} bpm", bpm);
            }
            AppEvent::DesiredChanged { from, to } => {
                info!("FAN | desired {} -> {}", from.name(), to.name());
            }
            AppEvent::FanActuated(a) => {
                info!(
                    "FAN | applied {} -> {} (off-hold + {} presses)",
                    a.from.name(),
                    a.to.name(),
                    a.presses
                );
            }
            AppEvent::ActuationFailed { target, error } => {
                warn!("FAN | actuation to {} failed: {}", target.name(), error);
            }
            AppEvent::Status(s) => {
                info!(
                    "STATUS | link={} | bpm={} | fan={}/{} | dwell={}ms | \
                     rejected={} | attempts={}",
                    s.link.name(),
                    s.bpm.unwrap_or(0),
                    s.applied.name(),
                    s.desired.name(),
                    s.dwell_remaining_ms,
                    s.rejected_payloads,
                    s.connect_attempts,
                );
            }
        }
    }
}
