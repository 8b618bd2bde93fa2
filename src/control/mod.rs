//! Fan control logic: what speed to run, and when a change is allowed.

pub mod decision;
pub mod dwell;
