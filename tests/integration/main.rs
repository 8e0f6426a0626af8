//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one façade against the
//! recording ports in `mock_hal`.  All tests run on the host with no real
//! hardware required.

mod analog_in_tests;
mod mock_hal;
mod pwm_out_tests;
