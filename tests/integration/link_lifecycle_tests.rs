//! Integration tests for the link lifecycle: scanning, handshake failures,
//! and link loss, as seen through the transport and the fan.

use crate::mock_hw::{RadioCall, Rig, STRAP};

use hrfan::app::events::AppEvent;
use hrfan::app::ports::ActuatorPort;
use hrfan::config::ControllerConfig;
use hrfan::control::decision::FanSpeed;
use hrfan::error::LinkError;
use hrfan::fsm::StateId;

fn rig() -> (hrfan::app::service::AppService<'static>, Rig) {
    Rig::new(&ControllerConfig::default())
}

#[test]
fn boots_idle_and_scans_on_first_tick() {
    let (mut app, mut rig) = rig();
    assert_eq!(app.state(), StateId::Idle);
    assert!(rig.radio.calls.is_empty());

    rig.step(&mut app);
    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(rig.radio.calls, vec![RadioCall::StartScan { reset: true }]);

    // Nothing advertising: keep scanning, no restarts.
    for _ in 0..5 {
        rig.step(&mut app);
    }
    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(rig.radio.count(RadioCall::StartScan { reset: true }), 1);
}

#[test]
fn discovery_stops_scan_connects_and_arms() {
    let (mut app, mut rig) = rig();
    rig.connect(&mut app);

    assert_eq!(app.state(), StateId::Connected);
    assert_eq!(
        rig.radio.calls,
        vec![
            RadioCall::StartScan { reset: true },
            RadioCall::StopScan,
            RadioCall::Connect(STRAP),
            RadioCall::EnableNotifications,
        ]
    );
    assert!(rig.sink.events.contains(&AppEvent::LinkChanged {
        from: StateId::Scanning,
        to: StateId::Connected,
    }));
}

#[test]
fn connect_failure_rescans_next_tick() {
    let (mut app, mut rig) = rig();
    rig.radio.connect_results.push(Err(LinkError::ConnectFailed));
    rig.connect(&mut app);

    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(rig.radio.count(RadioCall::EnableNotifications), 0);
    assert_eq!(rig.radio.count(RadioCall::Disconnect), 0);

    rig.step(&mut app);
    assert_eq!(rig.radio.count(RadioCall::StartScan { reset: true }), 2);
    assert_eq!(rig.radio.count(RadioCall::StartScan { reset: false }), 0);

    // Second attempt succeeds.
    rig.radio.advertising = Some(STRAP);
    rig.step(&mut app);
    assert_eq!(app.state(), StateId::Connected);
    assert_eq!(app.connect_stats(), (2, 1));
}

#[test]
fn arm_failure_tears_link_down() {
    let (mut app, mut rig) = rig();
    rig.radio.arm_results.push(Err(LinkError::NotifyArmFailed));
    rig.connect(&mut app);

    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(rig.radio.count(RadioCall::Disconnect), 1);

    // A late disconnect report for the torn-down link is ignored.
    rig.mailbox.post_disconnect();
    rig.step(&mut app);
    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(rig.radio.count(RadioCall::StartScan { reset: true }), 2);
}

#[test]
fn scan_start_failure_retries_every_tick() {
    let (mut app, mut rig) = rig();
    rig.radio.scan_results = vec![
        Err(LinkError::ScanStartFailed),
        Err(LinkError::ScanStartFailed),
    ];

    rig.step(&mut app);
    rig.step(&mut app);
    rig.step(&mut app);
    assert_eq!(rig.radio.count(RadioCall::StartScan { reset: true }), 3);
    assert!(rig.radio.is_scanning());
    assert_eq!(app.state(), StateId::Scanning);
}

#[test]
fn scan_refused_after_start_is_restarted() {
    let (mut app, mut rig) = rig();
    rig.step(&mut app);
    assert!(rig.radio.is_scanning());

    // The stack accepted the start, then dropped the scan.
    rig.radio.scan_dropped = true;
    rig.step(&mut app);
    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(rig.radio.count(RadioCall::StartScan { reset: true }), 2);
    assert!(rig.radio.is_scanning());

    rig.radio.advertising = Some(STRAP);
    rig.step(&mut app);
    assert_eq!(app.state(), StateId::Connected);
}

#[test]
fn link_loss_drops_in_flight_sample_and_forces_off() {
    let (mut app, mut rig) = rig();
    rig.connect(&mut app);
    rig.clock.set(20_000);

    rig.notify(140);
    rig.step(&mut app);
    assert_eq!(rig.fan.applied_speed(), FanSpeed::High);
    rig.line.clear();

    // A sample lands, then the link drops before the loop sees it.
    rig.notify(105);
    rig.mailbox.post_disconnect();
    rig.step(&mut app);

    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(app.desired_speed(), FanSpeed::Off);
    assert!(!rig.sink.events.contains(&AppEvent::HeartRate(105)));
    assert_eq!(app.status(&rig.fan, rig.clock_now()).bpm, None);

    // Forced Off is applied once the dwell gate reopens.
    rig.clock.advance(15_000);
    rig.step(&mut app);
    assert_eq!(rig.fan.applied_speed(), FanSpeed::Off);
    assert_eq!(rig.line.pulses(), vec![3_000]);
}

#[test]
fn reconnect_accepts_reading_equal_to_pre_loss_value() {
    let (mut app, mut rig) = rig();
    rig.connect(&mut app);

    rig.notify(120);
    rig.step(&mut app);
    rig.mailbox.post_disconnect();
    rig.step(&mut app);
    assert_eq!(app.state(), StateId::Idle);

    // Idle → Scanning → Connected.
    rig.connect(&mut app);
    assert_eq!(app.state(), StateId::Connected);

    rig.notify(120);
    rig.step(&mut app);
    let readings = rig.sink.count(|e| *e == AppEvent::HeartRate(120));
    assert_eq!(readings, 2);
    assert_eq!(app.desired_speed(), FanSpeed::Med);
}

#[test]
fn samples_outside_connected_are_never_consumed() {
    let (mut app, mut rig) = rig();
    rig.step(&mut app);

    // Stray notification while still scanning.
    rig.notify(150);
    rig.step(&mut app);
    assert_eq!(app.desired_speed(), FanSpeed::Off);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::HeartRate(_))), 0);
}
