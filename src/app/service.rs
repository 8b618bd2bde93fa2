//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the link FSM, the decision engine, and the dwell
//! gate.  It is the one context object the scheduling loop holds; all I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  LinkMailbox ──▶ ┌──────────────────────────┐ ──▶ EventSink
//! TransportPort ◀─▶│        AppService         │
//!   ClockPort ───▶ │ FSM · Decision · Dwell    │ ──▶ ActuatorPort
//!                  └──────────────────────────┘
//! ```
//!
//! One [`tick`](AppService::tick) per loop cadence:
//!
//! 1. gather link inputs (mailbox link-lost flag, discovery + handshake)
//! 2. advance the FSM and apply its commands through the transport
//! 3. consume the pending sample (only while connected)
//! 4. evaluate the desired speed
//! 5. actuate if it differs from the applied speed and the dwell gate is open
//! 6. emit events

use embassy_time::Duration;
use log::{info, warn};

use crate::config::ControllerConfig;
use crate::control::decision::{DecisionEngine, FanSpeed, SpeedBands};
use crate::control::dwell::FanChangeTimer;
use crate::error::{LinkError, Result};
use crate::fsm::context::LinkContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::mailbox::LinkMailbox;

use super::events::{AppEvent, StatusSnapshot};
use super::ports::{ActuatorPort, ClockPort, EventSink, PeerAddress, TransportPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService<'m> {
    fsm: Fsm,
    ctx: LinkContext,
    mailbox: &'m LinkMailbox,
    decision: DecisionEngine,
    dwell: FanChangeTimer,
    /// Last heart rate consumed on the current link.
    last_bpm: Option<u8>,
    status_interval_ticks: u32,
    tick_count: u64,
}

impl<'m> AppService<'m> {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: &ControllerConfig, mailbox: &'m LinkMailbox) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: LinkContext::new(),
            mailbox,
            decision: DecisionEngine::new(SpeedBands::from_config(config)),
            dwell: FanChangeTimer::new(Duration::from_millis(config.min_dwell_ms as u64), 0),
            last_bpm: None,
            status_interval_ticks: config.status_interval_ticks,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Idle and open the first dwell window.
    pub fn start(&mut self, clock: &impl ClockPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        self.ctx.commands.clear();
        self.dwell.reset(clock.now_ms());
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.
    ///
    /// May block for the length of an actuation sequence.
    pub fn tick(
        &mut self,
        transport: &mut impl TransportPort,
        fan: &mut impl ActuatorPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();

        // 1. Gather link inputs
        if self.mailbox.take_link_lost() {
            self.ctx.inputs.link_lost = true;
        }
        if prev_state == StateId::Scanning {
            if transport.take_scan_failure() {
                self.ctx.inputs.scan_failed = true;
            } else if let Some(peer) = transport.take_discovered() {
                self.ctx.inputs.connect_outcome = Some(Self::handshake(transport, peer));
            }
        }

        // 2. FSM tick, then apply its commands
        self.fsm.tick(&mut self.ctx);
        self.apply_link_commands(transport);

        let state = self.fsm.current_state();
        if state != prev_state {
            sink.emit(&AppEvent::LinkChanged {
                from: prev_state,
                to: state,
            });
        }

        // 3. Consume the pending sample
        let sample = if state == StateId::Connected {
            self.mailbox.take_sample()
        } else {
            None
        };
        if let Some(s) = sample {
            self.last_bpm = Some(s.bpm);
            sink.emit(&AppEvent::HeartRate(s.bpm));
        }

        // 4. Decision
        let prev_desired = self.decision.desired();
        let desired = self.decision.evaluate(state, sample.map(|s| s.bpm));
        if desired != prev_desired {
            sink.emit(&AppEvent::DesiredChanged {
                from: prev_desired,
                to: desired,
            });
        }

        // 5. Dwell-gated actuation
        if desired != fan.applied_speed() && self.dwell.has_elapsed(clock.now_ms()) {
            self.actuate(desired, fan, clock, sink);
        }

        // 6. Periodic status
        if self.status_interval_ticks > 0
            && self.tick_count % self.status_interval_ticks as u64 == 0
        {
            sink.emit(&AppEvent::Status(self.status(fan, clock.now_ms())));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Read-only snapshot for the display.
    pub fn status(&self, fan: &impl ActuatorPort, now_ms: u64) -> StatusSnapshot {
        StatusSnapshot {
            link: self.fsm.current_state(),
            bpm: self.last_bpm,
            desired: self.decision.desired(),
            applied: fan.applied_speed(),
            dwell_remaining_ms: self.dwell.remaining(now_ms).as_millis(),
            rejected_payloads: self.mailbox.rejected_payloads(),
            connect_attempts: self.ctx.connect_attempts,
        }
    }

    /// Current link state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Speed the decision engine currently recommends.
    pub fn desired_speed(&self) -> FanSpeed {
        self.decision.desired()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Connect handshakes attempted / failed since boot.
    pub fn connect_stats(&self) -> (u32, u32) {
        (self.ctx.connect_attempts, self.ctx.failed_connects)
    }

    // ── Internal ──────────────────────────────────────────────

    /// Stop scanning, connect, and arm notifications.
    ///
    /// A failure after the connection opened tears it down again.
    fn handshake(
        transport: &mut impl TransportPort,
        peer: PeerAddress,
    ) -> core::result::Result<(), LinkError> {
        info!("LINK: found heart-rate sensor {}", peer);
        transport.stop_scan();
        transport.connect(peer)?;
        if let Err(e) = transport.enable_notifications() {
            warn!("LINK: arming notifications failed ({}), disconnecting", e);
            transport.disconnect();
            return Err(e);
        }
        Ok(())
    }

    /// Translate FSM link commands into transport calls.
    fn apply_link_commands(&mut self, transport: &mut impl TransportPort) {
        let cmds = self.ctx.commands;
        self.ctx.commands.clear();

        if cmds.flush_samples {
            self.mailbox.clear_samples();
            self.last_bpm = None;
        }

        if cmds.start_scan {
            if let Err(e) = transport.start_scan(true) {
                warn!("LINK: {}", e);
                self.ctx.inputs.scan_failed = true;
            }
        }
    }

    fn actuate(
        &mut self,
        target: FanSpeed,
        fan: &mut impl ActuatorPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        let result = fan.apply_speed(target);

        // Dwell runs from the end of the sequence, successful or not.
        self.dwell.reset(clock.now_ms());

        match result {
            Ok(actuation) => sink.emit(&AppEvent::FanActuated(actuation)),
            Err(error) => {
                warn!("FAN: actuation to {} aborted: {}", target.name(), error);
                sink.emit(&AppEvent::ActuationFailed { target, error });
            }
        }
    }
}
