//! Port traits — the boundary between the peripheral façade and the HAL.
//!
//! ```text
//!   PwmOut / AnalogIn / Timer ──▶ Port trait ──▶ Adapter (ESP-IDF or sim)
//! ```
//!
//! The façade types in [`drivers`](crate::drivers) are generic over these
//! traits and own exactly one port value each.  Adapters in
//! [`adapters`](crate::adapters) implement them against ESP-IDF; tests
//! implement them with recording mocks.
//!
//! Each trait is also implemented for `&mut` of any implementor, so a
//! façade can borrow a port instead of owning it.
//!
//! `deinit` is infallible on every port: it runs from `Drop`, so adapters
//! log failures instead of returning them.

use crate::drivers::timer::TimerMode;
use crate::error::{AdcError, PwmError, TimerError};
use crate::pins::{AdcId, PwmId, TimerId};
use crate::registry::CallbackHandle;

// ───────────────────────────────────────────────────────────────
// PWM
// ───────────────────────────────────────────────────────────────

/// Full PWM configuration pushed on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmConfig {
    /// Period in microseconds.
    pub period_us: u32,
    /// High time per period in microseconds.  Not guaranteed `<= period_us`.
    pub pulse_us: u32,
}

pub trait PwmPort {
    /// Acquire the output selected by `id`.
    fn init(&mut self, id: PwmId) -> Result<(), PwmError>;

    /// Apply period and pulse.
    fn configure(&mut self, config: &PwmConfig) -> Result<(), PwmError>;

    /// Release the output; the pin idles low afterwards.
    fn deinit(&mut self);
}

impl<P: PwmPort + ?Sized> PwmPort for &mut P {
    fn init(&mut self, id: PwmId) -> Result<(), PwmError> {
        P::init(self, id)
    }

    fn configure(&mut self, config: &PwmConfig) -> Result<(), PwmError> {
        P::configure(self, config)
    }

    fn deinit(&mut self) {
        P::deinit(self);
    }
}

// ───────────────────────────────────────────────────────────────
// ADC
// ───────────────────────────────────────────────────────────────

pub trait AdcPort {
    /// Acquire the input selected by `id`.
    fn init(&mut self, id: AdcId) -> Result<(), AdcError>;

    /// Take one fresh sample.
    fn read(&mut self) -> Result<u16, AdcError>;

    fn deinit(&mut self);
}

impl<A: AdcPort + ?Sized> AdcPort for &mut A {
    fn init(&mut self, id: AdcId) -> Result<(), AdcError> {
        A::init(self, id)
    }

    fn read(&mut self) -> Result<u16, AdcError> {
        A::read(self)
    }

    fn deinit(&mut self) {
        A::deinit(self);
    }
}

// ───────────────────────────────────────────────────────────────
// Timer
// ───────────────────────────────────────────────────────────────

/// Mode and period of a hardware timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub mode: TimerMode,
    pub period_ms: u32,
}

pub trait TimerPort {
    /// Acquire the timer selected by `id`.
    fn init(&mut self, id: TimerId) -> Result<(), TimerError>;

    /// Store mode and period; takes effect on the next `start`.
    fn configure(&mut self, config: &TimerConfig) -> Result<(), TimerError>;

    /// Register the interrupt trampoline for `handle`.
    ///
    /// Implementations must route every expiry to
    /// [`registry::dispatch(handle)`](crate::registry::dispatch) and must
    /// carry the handle as a plain integer context, never as a pointer to
    /// Rust data.
    fn attach(&mut self, handle: CallbackHandle) -> Result<(), TimerError>;

    /// Arm the timer with the last configuration.  Re-arms if running.
    fn start(&mut self) -> Result<(), TimerError>;

    /// Disarm.  Stopping an idle timer is not an error.
    fn stop(&mut self) -> Result<(), TimerError>;

    /// Restart counting from zero without touching the configuration.
    fn reset_count(&mut self) -> Result<(), TimerError>;

    fn deinit(&mut self);
}

impl<T: TimerPort + ?Sized> TimerPort for &mut T {
    fn init(&mut self, id: TimerId) -> Result<(), TimerError> {
        T::init(self, id)
    }

    fn configure(&mut self, config: &TimerConfig) -> Result<(), TimerError> {
        T::configure(self, config)
    }

    fn attach(&mut self, handle: CallbackHandle) -> Result<(), TimerError> {
        T::attach(self, handle)
    }

    fn start(&mut self) -> Result<(), TimerError> {
        T::start(self)
    }

    fn stop(&mut self) -> Result<(), TimerError> {
        T::stop(self)
    }

    fn reset_count(&mut self) -> Result<(), TimerError> {
        T::reset_count(self)
    }

    fn deinit(&mut self) {
        T::deinit(self);
    }
}
