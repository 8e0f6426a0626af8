//! Shared helpers for the ESP-IDF adapters.
//!
//! The conversions are target-independent so the simulation stubs apply
//! exactly the same arithmetic as the real drivers.

use crate::pins::PWM_RESOLUTION_BITS;
use crate::ports::PwmConfig;

/// LEDC duty value meaning "always high" at the configured resolution.
pub(super) const LEDC_FULL_DUTY: u32 = 1 << PWM_RESOLUTION_BITS;

/// Frequency for a period, or `None` if the period is zero or longer than
/// one second (LEDC cannot go below 1 Hz).
pub(super) fn ledc_frequency(period_us: u32) -> Option<u32> {
    match 1_000_000u32.checked_div(period_us) {
        Some(0) | None => None,
        Some(hz) => Some(hz),
    }
}

/// LEDC duty ticks for a period/pulse pair.  A pulse longer than the period
/// saturates at full duty; the hardware has nothing above it.
pub(super) fn ledc_duty(config: &PwmConfig) -> u32 {
    if config.period_us == 0 {
        return 0;
    }
    let ticks =
        u64::from(config.pulse_us) * u64::from(LEDC_FULL_DUTY) / u64::from(config.period_us);
    ticks.min(u64::from(LEDC_FULL_DUTY)) as u32
}

/// Map an `esp_err_t` to `Err(code)` unless it is `ESP_OK`.
#[cfg(target_os = "espidf")]
pub(super) fn esp_result(rc: esp_idf_svc::sys::esp_err_t) -> Result<(), i32> {
    if rc == esp_idf_svc::sys::ESP_OK as i32 {
        Ok(())
    } else {
        Err(rc)
    }
}
