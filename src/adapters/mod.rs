//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                   |
//! |------------|--------------|-------------------------------|
//! | `hardware` | SensorPort   | ESP32 GPIO, ADC, 1-Wire       |
//! |            | ActuatorPort | ESP32 LEDC PWM                |
//! | `display`  | DisplayPort  | Debug log (panel stand-in)    |
//! | `log_sink` | EventSink    | Serial log output             |
//! | `time`     | MonotonicClock | ESP32 system timer          |
//! | `wifi`     | —            | ESP-IDF WiFi STA + SNTP       |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod wifi;
