//! Peripheral façade types.
//!
//! Each type owns one port value, converts user units, and pushes the full
//! configuration to the port on every change.

pub mod analog_in;
pub mod pwm_out;
pub mod timer;
