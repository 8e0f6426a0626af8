//! Unified error types for the peripheral façade.
//!
//! Each peripheral family has its own small `Copy` error enum returned by
//! its port trait; all of them convert into the crate-wide [`Error`] so
//! firmware code can funnel everything through one `Result` alias.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A PWM output could not be acquired or configured.
    Pwm(PwmError),
    /// An analog input could not be acquired or sampled.
    Adc(AdcError),
    /// A hardware timer could not be acquired, configured or driven.
    Timer(TimerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pwm(e) => write!(f, "pwm: {e}"),
            Self::Adc(e) => write!(f, "adc: {e}"),
            Self::Timer(e) => write!(f, "timer: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// PWM errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// The PWM id has no entry in the board table.
    UnknownId(u8),
    /// Configure was attempted on an output that was never initialised.
    NotInitialised,
    /// Frequency of zero cannot be turned into a period.
    InvalidFrequency,
    /// Period of zero (or one the peripheral cannot generate).
    InvalidPeriod(u32),
    /// An ESP-IDF call returned a non-OK code.
    Hal { op: &'static str, code: i32 },
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownId(id) => write!(f, "unknown PWM id {id}"),
            Self::NotInitialised => write!(f, "PWM output not initialised"),
            Self::InvalidFrequency => write!(f, "frequency must be greater than zero"),
            Self::InvalidPeriod(us) => write!(f, "unsupported period {us}us"),
            Self::Hal { op, code } => write!(f, "{op} failed (rc={code})"),
        }
    }
}

impl core::error::Error for PwmError {}

impl From<PwmError> for Error {
    fn from(e: PwmError) -> Self {
        Self::Pwm(e)
    }
}

// The façade implements `embedded_hal::pwm::SetDutyCycle`, which needs a
// classified error type.
impl embedded_hal::pwm::Error for PwmError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

// ---------------------------------------------------------------------------
// ADC errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcError {
    /// The ADC id has no entry in the board table.
    UnknownId(u8),
    /// A read was attempted on an input that was never initialised.
    NotInitialised,
    /// An ESP-IDF call returned a non-OK code.
    Hal { op: &'static str, code: i32 },
}

impl fmt::Display for AdcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownId(id) => write!(f, "unknown ADC id {id}"),
            Self::NotInitialised => write!(f, "ADC channel not initialised"),
            Self::Hal { op, code } => write!(f, "{op} failed (rc={code})"),
        }
    }
}

impl core::error::Error for AdcError {}

impl From<AdcError> for Error {
    fn from(e: AdcError) -> Self {
        Self::Adc(e)
    }
}

// ---------------------------------------------------------------------------
// Timer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The timer id has no entry in the board table.
    UnknownId(u8),
    /// Attach was attempted on a timer that was never initialised.
    NotInitialised,
    /// Start was requested before the trampoline was attached.
    NotAttached,
    /// Every callback slot in the registry is taken.
    RegistryFull,
    /// An ESP-IDF call returned a non-OK code.
    Hal { op: &'static str, code: i32 },
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownId(id) => write!(f, "unknown timer id {id}"),
            Self::NotInitialised => write!(f, "timer not initialised"),
            Self::NotAttached => write!(f, "interrupt trampoline not attached"),
            Self::RegistryFull => write!(f, "callback registry full"),
            Self::Hal { op, code } => write!(f, "{op} failed (rc={code})"),
        }
    }
}

impl core::error::Error for TimerError {}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Self::Timer(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
