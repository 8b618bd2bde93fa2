//! HrFan Firmware — Main Entry Point
//!
//! Heart-rate-driven fan controller: a BLE chest strap in, one fan mode
//! button out.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  BleCentral        FanButton         LogEventSink  Esp32Time   │
//! │  (TransportPort)   (ActuatorPort)    (EventSink)   (ClockPort) │
//! │       │                                                        │
//! │       └─▶ LINK_MAILBOX (notifications, disconnects)            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Link FSM · Decision · Dwell gate                      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{debug, info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};

use hrfan::adapters::ble_central::BleCentral;
use hrfan::adapters::log_sink::LogEventSink;
use hrfan::adapters::time::Esp32TimeAdapter;
use hrfan::app::ports::ClockPort;
use hrfan::app::service::AppService;
use hrfan::config::ControllerConfig;
use hrfan::display;
use hrfan::drivers::fan_button::{FanButton, PulseTiming};
use hrfan::drivers::watchdog::Watchdog;
use hrfan::mailbox::LINK_MAILBOX;
use hrfan::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  HrFan v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = ControllerConfig::default();
    config.validate().map_err(|e| anyhow::anyhow!("{e}"))?;

    let watchdog = Watchdog::default();
    if !watchdog.covers(config.tick_interval_ms, config.longest_actuation_ms()) {
        warn!("Watchdog timeout does not cover a full actuation tick");
    }

    // ── 2. Construct adapters ─────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();

    // SAFETY: the fan line GPIO is claimed exactly once, here.
    let fan_pin = unsafe { AnyOutputPin::new(pins::FAN_BUTTON_GPIO) };
    let mut fan = FanButton::new(
        PinDriver::output(fan_pin)?,
        FreeRtos,
        PulseTiming::from_config(&config),
        config.button_active_low,
    )
    .map_err(|e| anyhow::anyhow!("fan line: {e}"))?;

    let mut ble = BleCentral::new(&config);
    ble.init().map_err(|e| anyhow::anyhow!("BLE: {e}"))?;

    // ── 3. Construct app service ──────────────────────────────
    let mut app =
        AppService::new(&config, &LINK_MAILBOX).map_err(|e| anyhow::anyhow!("{e}"))?;
    app.start(&clock, &mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 4. Control loop ───────────────────────────────────────
    let tick_ms = config.tick_interval_ms as u64;
    loop {
        let started = clock.now_ms();

        app.tick(&mut ble, &mut fan, &clock, &mut log_sink);

        let now = clock.now_ms();
        let [link, hr, fan_line] = display::status_lines(&app.status(&fan, now));
        debug!("DISPLAY | {} | {} | {}", link, hr, fan_line);

        // Feed watchdog on every iteration.
        watchdog.feed();

        // Hold the cadence; a tick that ran an actuation sequence
        // simply starts the next one immediately.
        let spent = now.saturating_sub(started);
        if spent < tick_ms {
            FreeRtos::delay_ms((tick_ms - spent) as u32);
        }
    }
}
