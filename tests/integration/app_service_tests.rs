//! Integration tests for the AppService → decision → dwell → fan line
//! pipeline.
//!
//! Every test drives the service tick by tick against the mock rig; the
//! mock delay moves the clock, so blocking actuation is accounted for the
//! same way it is on the device.

use crate::mock_hw::Rig;

use hrfan::app::events::AppEvent;
use hrfan::config::ControllerConfig;
use hrfan::control::decision::FanSpeed;
use hrfan::app::ports::ActuatorPort;
use hrfan::error::ActuatorError;
use hrfan::fsm::StateId;

fn connected_rig() -> (hrfan::app::service::AppService<'static>, Rig) {
    let (mut app, mut rig) = Rig::new(&ControllerConfig::default());
    rig.connect(&mut app);
    assert_eq!(app.state(), StateId::Connected);
    (app, rig)
}

// ── End-to-end: High after dwell, then Off one dwell later ───

#[test]
fn high_then_off_respects_dwell_from_end_of_actuation() {
    let (mut app, mut rig) = connected_rig();
    assert_eq!(rig.clock_now(), 2_000);

    rig.notify(135);
    rig.step(&mut app);
    assert_eq!(app.desired_speed(), FanSpeed::High);
    assert!(rig.line.edges().is_empty(), "boot dwell still running");

    // Gate opens 15 s after boot.
    while rig.clock_now() < 15_000 {
        rig.step(&mut app);
    }
    assert_eq!(rig.line.first_press_at(), Some(15_000));
    assert_eq!(rig.line.pulses(), vec![3_000, 250]);
    assert_eq!(rig.fan.applied_speed(), FanSpeed::High);
    // Sequence ran 15 000 → 18 750.
    assert_eq!(rig.clock_now(), 18_750);

    rig.line.clear();
    rig.notify(90);
    rig.step(&mut app);
    assert_eq!(app.desired_speed(), FanSpeed::Off);

    // 19 750 .. 32 750: still inside the dwell window.
    for _ in 0..13 {
        rig.step(&mut app);
    }
    assert!(rig.line.edges().is_empty());
    assert_eq!(rig.fan.applied_speed(), FanSpeed::High);

    // 33 750 = 18 750 + 15 000.
    rig.step(&mut app);
    assert_eq!(rig.line.first_press_at(), Some(33_750));
    assert_eq!(rig.line.pulses(), vec![3_000]);
    assert_eq!(rig.fan.applied_speed(), FanSpeed::Off);

    let actuations = rig.sink.count(|e| matches!(e, AppEvent::FanActuated(_)));
    assert_eq!(actuations, 2);
}

#[test]
fn press_count_depends_only_on_target() {
    let (mut app, mut rig) = connected_rig();
    rig.clock.set(20_000);

    rig.notify(105);
    rig.step(&mut app);
    assert_eq!(rig.fan.applied_speed(), FanSpeed::Low);
    assert_eq!(rig.line.pulses(), vec![3_000, 250, 250, 250]);

    rig.line.clear();
    rig.clock.advance(20_000);
    rig.notify(120);
    rig.step(&mut app);
    assert_eq!(rig.fan.applied_speed(), FanSpeed::Med);
    assert_eq!(rig.line.pulses(), vec![3_000, 250, 250]);
}

#[test]
fn unchanged_speed_never_touches_the_line() {
    let (mut app, mut rig) = connected_rig();
    rig.clock.set(20_000);

    // Off → Off: nothing to do, even with the gate open.
    rig.notify(80);
    for _ in 0..5 {
        rig.step(&mut app);
    }
    assert!(rig.line.edges().is_empty());

    // Different bpm, same band.
    rig.notify(140);
    rig.step(&mut app);
    rig.line.clear();
    rig.clock.advance(30_000);
    rig.notify(150);
    rig.step(&mut app);
    assert!(rig.line.edges().is_empty());
    assert_eq!(rig.fan.applied_speed(), FanSpeed::High);
}

#[test]
fn duplicate_and_zero_readings_do_not_reach_the_decision() {
    let (mut app, mut rig) = connected_rig();

    rig.notify(120);
    rig.step(&mut app);
    let hr_events = |rig: &Rig| rig.sink.count(|e| matches!(e, AppEvent::HeartRate(_)));
    assert_eq!(hr_events(&rig), 1);

    rig.notify(120);
    rig.notify(0);
    rig.step(&mut app);
    assert_eq!(hr_events(&rig), 1);
    assert_eq!(rig.mailbox.filtered_readings(), 2);
    assert_eq!(app.desired_speed(), FanSpeed::Med);
}

#[test]
fn only_latest_sample_per_tick_is_consumed() {
    let (mut app, mut rig) = connected_rig();

    rig.notify(105);
    rig.notify(140);
    rig.step(&mut app);
    assert_eq!(app.desired_speed(), FanSpeed::High);
    assert!(rig.sink.events.contains(&AppEvent::HeartRate(140)));
    assert!(!rig.sink.events.contains(&AppEvent::HeartRate(105)));
}

#[test]
fn short_payload_is_counted_and_ignored() {
    let (mut app, mut rig) = connected_rig();

    assert!(rig.mailbox.post_notification(&[0x00], 0).is_err());
    rig.step(&mut app);
    assert_eq!(app.desired_speed(), FanSpeed::Off);

    let status = app.status(&rig.fan, rig.clock_now());
    assert_eq!(status.rejected_payloads, 1);
    assert_eq!(status.bpm, None);
}

// ── GPIO failure ─────────────────────────────────────────────

#[test]
fn gpio_failure_aborts_sequence_and_keeps_applied_speed() {
    let config = ControllerConfig::default();
    // Off-hold press and release succeed, the first short press fails.
    let (mut app, mut rig) = Rig::with_pin_failure(&config, Some(2));
    rig.connect(&mut app);
    rig.clock.set(20_000);

    rig.notify(140);
    rig.step(&mut app);

    assert_eq!(rig.fan.applied_speed(), FanSpeed::Off);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::ActuationFailed {
            target: FanSpeed::High,
            error: ActuatorError::GpioWriteFailed(_),
        }
    )));

    // Dwell restarted at the abort point: no retry for 15 s.
    let aborted_at = rig.clock_now();
    let status = app.status(&rig.fan, aborted_at);
    assert_eq!(status.dwell_remaining_ms, 15_000);
}

// ── Status ───────────────────────────────────────────────────

#[test]
fn status_reflects_pending_change() {
    let (mut app, mut rig) = connected_rig();

    rig.notify(125);
    rig.step(&mut app);

    let status = app.status(&rig.fan, rig.clock_now());
    assert_eq!(status.link, StateId::Connected);
    assert_eq!(status.bpm, Some(125));
    assert_eq!(status.desired, FanSpeed::Med);
    assert_eq!(status.applied, FanSpeed::Off);
    assert_eq!(status.dwell_remaining_ms, 12_000);
    assert_eq!(status.connect_attempts, 1);

    let [_, hr, fan] = hrfan::display::status_lines(&status);
    assert_eq!(hr.as_str(), "HR: 125 bpm");
    assert_eq!(fan.as_str(), "FAN: Off -> Med 12s");
}
