//! Mock hardware for integration tests.
//!
//! Records every fan-line edge against a shared mock clock, so tests can
//! assert on the exact pulse train without touching real GPIO.  The mock
//! delay advances the same clock, which makes blocking actuation visible
//! to the dwell gate exactly as on the device.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use hrfan::app::events::AppEvent;
use hrfan::app::ports::{ClockPort, EventSink, PeerAddress, TransportPort};
use hrfan::app::service::AppService;
use hrfan::config::ControllerConfig;
use hrfan::drivers::fan_button::{FanButton, PulseTiming};
use hrfan::error::LinkError;
use hrfan::mailbox::LinkMailbox;

pub const STRAP: PeerAddress = PeerAddress([0xc0, 0xff, 0xee, 0x00, 0x00, 0x01]);

// ── Clock ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockClock(Rc<Cell<u64>>);

#[allow(dead_code)]
impl MockClock {
    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ── Fan line ──────────────────────────────────────────────────

/// One level change on the fan line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub at_ms: u64,
    pub high: bool,
}

#[derive(Clone, Default)]
pub struct LineTrace(Rc<RefCell<Vec<Edge>>>);

#[allow(dead_code)]
impl LineTrace {
    pub fn edges(&self) -> Vec<Edge> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Durations of every pressed (high) interval, in order.
    pub fn pulses(&self) -> Vec<u64> {
        let edges = self.0.borrow();
        let mut out = Vec::new();
        let mut rise = None;
        for e in edges.iter() {
            match (e.high, rise) {
                (true, None) => rise = Some(e.at_ms),
                (false, Some(t)) => {
                    out.push(e.at_ms - t);
                    rise = None;
                }
                _ => {}
            }
        }
        out
    }

    /// Time of the first rising edge.
    pub fn first_press_at(&self) -> Option<u64> {
        self.0.borrow().iter().find(|e| e.high).map(|e| e.at_ms)
    }
}

pub struct RecordingPin {
    clock: MockClock,
    trace: LineTrace,
    /// Fail every write once this many writes have succeeded.
    fail_after: Option<usize>,
    writes: usize,
}

#[derive(Debug)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl RecordingPin {
    fn record(&mut self, high: bool) -> Result<(), PinFault> {
        if self.fail_after.is_some_and(|n| self.writes >= n) {
            return Err(PinFault);
        }
        self.writes += 1;
        self.trace.0.borrow_mut().push(Edge {
            at_ms: self.clock.now_ms(),
            high,
        });
        Ok(())
    }
}

impl ErrorType for RecordingPin {
    type Error = PinFault;
}

impl OutputPin for RecordingPin {
    fn set_high(&mut self) -> Result<(), PinFault> {
        self.record(true)
    }

    fn set_low(&mut self) -> Result<(), PinFault> {
        self.record(false)
    }
}

/// Blocking delay that advances the mock clock instead of sleeping.
pub struct MockDelay(MockClock);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance(u64::from(ns) / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.advance(u64::from(ms));
    }
}

// ── Transport ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioCall {
    StartScan { reset: bool },
    StopScan,
    Connect(PeerAddress),
    EnableNotifications,
    Disconnect,
}

/// Transport whose outcomes are scripted by the test.
#[derive(Default)]
pub struct ScriptedTransport {
    pub calls: Vec<RadioCall>,
    pub advertising: Option<PeerAddress>,
    pub connect_results: Vec<Result<(), LinkError>>,
    pub arm_results: Vec<Result<(), LinkError>>,
    pub scan_results: Vec<Result<(), LinkError>>,
    /// The running scan is refused by the stack on the next poll.
    pub scan_dropped: bool,
    scanning: bool,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn count(&self, call: RadioCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }
}

impl TransportPort for ScriptedTransport {
    fn start_scan(&mut self, reset_results: bool) -> Result<(), LinkError> {
        self.calls.push(RadioCall::StartScan {
            reset: reset_results,
        });
        let res = if self.scan_results.is_empty() {
            Ok(())
        } else {
            self.scan_results.remove(0)
        };
        self.scanning = res.is_ok();
        res
    }

    fn stop_scan(&mut self) {
        self.calls.push(RadioCall::StopScan);
        self.scanning = false;
    }

    fn take_scan_failure(&mut self) -> bool {
        if self.scanning && self.scan_dropped {
            self.scan_dropped = false;
            self.scanning = false;
            return true;
        }
        false
    }

    fn take_discovered(&mut self) -> Option<PeerAddress> {
        if self.scanning {
            self.advertising.take()
        } else {
            None
        }
    }

    fn connect(&mut self, peer: PeerAddress) -> Result<(), LinkError> {
        self.calls.push(RadioCall::Connect(peer));
        if self.connect_results.is_empty() {
            Ok(())
        } else {
            self.connect_results.remove(0)
        }
    }

    fn enable_notifications(&mut self) -> Result<(), LinkError> {
        self.calls.push(RadioCall::EnableNotifications);
        if self.arm_results.is_empty() {
            Ok(())
        } else {
            self.arm_results.remove(0)
        }
    }

    fn disconnect(&mut self) {
        self.calls.push(RadioCall::Disconnect);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// Everything an `AppService` talks to, wired to one mock clock.
pub struct Rig {
    pub clock: MockClock,
    pub line: LineTrace,
    pub fan: FanButton<RecordingPin, MockDelay>,
    pub radio: ScriptedTransport,
    pub sink: RecordingSink,
    pub mailbox: &'static LinkMailbox,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: &ControllerConfig) -> (AppService<'static>, Self) {
        Self::with_pin_failure(config, None)
    }

    /// Rig whose fan line fails after `ok_writes` successful writes.
    pub fn with_pin_failure(
        config: &ControllerConfig,
        ok_writes: Option<usize>,
    ) -> (AppService<'static>, Self) {
        let clock = MockClock::default();
        let line = LineTrace::default();
        let pin = RecordingPin {
            clock: clock.clone(),
            trace: line.clone(),
            fail_after: ok_writes.map(|n| n + 1),
            writes: 0,
        };
        let fan = FanButton::new(
            pin,
            MockDelay(clock.clone()),
            PulseTiming::from_config(config),
            config.button_active_low,
        )
        .expect("initial release");
        line.clear();

        let mailbox: &'static LinkMailbox = Box::leak(Box::new(LinkMailbox::new()));
        let mut app = AppService::new(config, mailbox).expect("valid config");
        let mut rig = Self {
            clock,
            line,
            fan,
            radio: ScriptedTransport::default(),
            sink: RecordingSink::default(),
            mailbox,
        };
        app.start(&rig.clock, &mut rig.sink);
        (app, rig)
    }

    pub fn clock_now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Advance one cadence interval and run a tick.
    pub fn step(&mut self, app: &mut AppService<'static>) {
        self.clock.advance(1_000);
        app.tick(&mut self.radio, &mut self.fan, &self.clock, &mut self.sink);
    }

    /// Idle → Scanning → Connected with a strap advertising.
    pub fn connect(&mut self, app: &mut AppService<'static>) {
        self.step(app);
        self.radio.advertising = Some(STRAP);
        self.step(app);
    }

    /// Deliver one measurement notification carrying `bpm`.
    pub fn notify(&self, bpm: u8) {
        // Flags byte 0x00: 8-bit bpm format.
        let _ = self.mailbox.post_notification(&[0x00, bpm], self.clock.now_ms());
    }
}
