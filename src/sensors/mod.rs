//! Sensor input processing.
//!
//! The only sensor is the chest strap; its samples arrive asynchronously
//! through the transport callback and are validated here before they reach
//! the [`mailbox`](crate::mailbox).

pub mod heart_rate;
