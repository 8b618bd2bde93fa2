//! Actuator and supervision drivers.

pub mod fan_button;
pub mod watchdog;
