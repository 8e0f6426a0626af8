//! Peripheral I/O façade for ESP32-S3 firmware.
//!
//! Three user-facing types wrap the platform drivers:
//!
//! - [`PwmOut`]: frequency / period / duty-cycle control of a PWM output
//! - [`AnalogIn`]: raw, percentage and voltage reads of an ADC input
//! - [`Timer`]: periodic or one-shot hardware timer with a user callback
//!
//! Each façade is generic over a port trait from [`ports`]; the
//! [`adapters`] module provides the ESP-IDF implementations (with host
//! simulations under `cfg(not(target_os = "espidf"))`).

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod ports;
pub mod registry;

pub use drivers::analog_in::AnalogIn;
pub use drivers::pwm_out::PwmOut;
pub use drivers::timer::{Timer, TimerMode};
pub use error::{Error, Result};
