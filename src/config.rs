//! Peripheral defaults and fixed conversion constants.
//!
//! The constants are what the façade types use; [`PeripheralDefaults`]
//! bundles them into one serialisable value so firmware can log or expose
//! the effective configuration.

use serde::{Deserialize, Serialize};

use crate::drivers::timer::TimerMode;

/// PWM frequency used when none is given (Hz).
pub const DEFAULT_PWM_FREQUENCY_HZ: u32 = 1_000;
/// PWM duty-cycle used when none is given.
pub const DEFAULT_PWM_DUTYCYCLE: f32 = 0.0;

/// Full-scale raw ADC count (12-bit converter).
pub const ADC_RESOLUTION: u16 = 4095;
/// ADC reference voltage (V).  Fixed, not read from eFuse calibration.
pub const ADC_REFERENCE_V: f32 = 3.3;

/// Timer mode used before the first `set_interrupt`.
pub const DEFAULT_TIMER_MODE: TimerMode = TimerMode::Periodic;
/// Timer period used before the first `set_interrupt` (ms).
pub const DEFAULT_TIMER_PERIOD_MS: u32 = 1_000;

/// Callback slots in the interrupt registry.  Must be a power of two.
pub const MAX_TIMER_CALLBACKS: usize = 32;

/// Effective defaults of every peripheral family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeripheralDefaults {
    // --- PWM ---
    /// Frequency applied by `PwmOut::new` (Hz)
    pub pwm_frequency_hz: u32,
    /// Duty-cycle applied by `PwmOut::new` (0.0-1.0)
    pub pwm_dutycycle: f32,

    // --- ADC ---
    /// Maximum raw count
    pub adc_resolution: u16,
    /// Reference voltage (V)
    pub adc_reference_v: f32,

    // --- Timer ---
    /// Mode applied by `Timer::new`
    pub timer_mode: TimerMode,
    /// Period applied by `Timer::new` (ms)
    pub timer_period_ms: u32,
    /// Registry capacity
    pub max_timer_callbacks: usize,
}

impl Default for PeripheralDefaults {
    fn default() -> Self {
        Self {
            pwm_frequency_hz: DEFAULT_PWM_FREQUENCY_HZ,
            pwm_dutycycle: DEFAULT_PWM_DUTYCYCLE,

            adc_resolution: ADC_RESOLUTION,
            adc_reference_v: ADC_REFERENCE_V,

            timer_mode: DEFAULT_TIMER_MODE,
            timer_period_ms: DEFAULT_TIMER_PERIOD_MS,
            max_timer_callbacks: MAX_TIMER_CALLBACKS,
        }
    }
}
