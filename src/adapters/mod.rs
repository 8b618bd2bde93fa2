//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements    | Connects to               |
//! |---------------|---------------|---------------------------|
//! | `ble_central` | TransportPort | Bluedroid GATT client     |
//! | `log_sink`    | EventSink     | Serial log output         |
//! | `time`        | ClockPort     | ESP32 high-res timer      |
//!
//! The fan line needs no adapter: [`FanButton`](crate::drivers::fan_button::FanButton)
//! implements `ActuatorPort` over any `embedded-hal` output pin.

pub mod ble_central;
pub mod log_sink;
pub mod time;
