//! Peripheral id types and the board mapping for the ESP32-S3 dev board.
//!
//! Single source of truth — every adapter resolves its id through the
//! tables here rather than hard-coding GPIO numbers or channels.  Change a
//! row here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Selects one PWM output (a row of [`PWM_OUTPUTS`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PwmId(pub u8);

/// Selects one analog input (a row of [`ADC_INPUTS`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdcId(pub u8);

/// Selects one hardware timer (a row of [`TIMERS`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u8);

// ---------------------------------------------------------------------------
// PWM (LEDC)
// ---------------------------------------------------------------------------

/// One PWM output: the GPIO it drives and the LEDC resources behind it.
///
/// Every output has its own LEDC timer, so changing the frequency of one
/// output never disturbs another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmPin {
    pub gpio: i32,
    pub ledc_channel: u32,
    pub ledc_timer: u32,
}

#[rustfmt::skip]
pub const PWM_OUTPUTS: [PwmPin; 4] = [
    PwmPin { gpio: 1, ledc_channel: 0, ledc_timer: 0 },
    PwmPin { gpio: 2, ledc_channel: 1, ledc_timer: 1 },
    PwmPin { gpio: 3, ledc_channel: 2, ledc_timer: 2 },
    PwmPin { gpio: 4, ledc_channel: 3, ledc_timer: 3 },
];

/// LEDC duty resolution (bits).  10 bits keeps frequencies up to ~78 kHz
/// reachable from the 80 MHz APB clock.
pub const PWM_RESOLUTION_BITS: u32 = 10;

pub fn pwm_pin(id: PwmId) -> Option<PwmPin> {
    PWM_OUTPUTS.get(id.0 as usize).copied()
}

// ---------------------------------------------------------------------------
// Analog inputs (ADC oneshot)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcUnit {
    Adc1,
    Adc2,
}

impl AdcUnit {
    /// Index into per-unit tables.
    pub const fn index(self) -> usize {
        match self {
            Self::Adc1 => 0,
            Self::Adc2 => 1,
        }
    }
}

/// One analog input: ADC unit and channel (GPIO noted for reference).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcPin {
    pub gpio: i32,
    pub unit: AdcUnit,
    pub channel: u32,
}

// ADC1 channel n sits on GPIO n+1 on the ESP32-S3; ADC2 channel n on GPIO n+11.
#[rustfmt::skip]
pub const ADC_INPUTS: [AdcPin; 6] = [
    AdcPin { gpio: 5, unit: AdcUnit::Adc1, channel: 4 },
    AdcPin { gpio: 6, unit: AdcUnit::Adc1, channel: 5 },
    AdcPin { gpio: 7, unit: AdcUnit::Adc1, channel: 6 },
    AdcPin { gpio: 8, unit: AdcUnit::Adc1, channel: 7 },
    AdcPin { gpio: 9, unit: AdcUnit::Adc1, channel: 8 },
    AdcPin { gpio: 12, unit: AdcUnit::Adc2, channel: 1 },
];

pub fn adc_pin(id: AdcId) -> Option<AdcPin> {
    ADC_INPUTS.get(id.0 as usize).copied()
}

// ---------------------------------------------------------------------------
// Hardware timers (esp_timer)
// ---------------------------------------------------------------------------

/// Null-terminated names handed to `esp_timer_create`; also the number of
/// timers the board exposes.
pub const TIMERS: [&str; 4] = ["timer0\0", "timer1\0", "timer2\0", "timer3\0"];

pub fn timer_name(id: TimerId) -> Option<&'static str> {
    TIMERS.get(id.0 as usize).copied()
}
