//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter       | Implements | Connects to                  |
//! |---------------|------------|------------------------------|
//! | `ledc`        | PwmPort    | ESP32 LEDC channel + timer   |
//! | `adc_oneshot` | AdcPort    | ESP32 ADC oneshot driver     |
//! | `esp_timer`   | TimerPort  | ESP-IDF high-resolution timer|
//!
//! Every adapter also builds on the host, where it simulates the
//! peripheral in memory so the façades can be exercised end to end.

pub mod adc_oneshot;
pub mod esp_timer;
pub mod ledc;
pub(super) mod utils;
