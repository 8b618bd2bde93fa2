//! Application core — pure domain logic, zero I/O.
//!
//! This module wires the link FSM, the speed decision, and the dwell gate
//! into one tick-driven service.  All interaction with the radio, the fan
//! line, and the clock happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
