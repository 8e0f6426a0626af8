//! PWM output façade.
//!
//! Holds the period/pulse pair in microseconds and pushes the full
//! configuration to its [`PwmPort`] on every change.  Frequency and
//! duty-cycle are converted here; the port only ever sees microseconds.
//!
//! Duty-cycle and pulse values are *not* range-checked: a duty-cycle
//! outside `0.0..=1.0` or a pulse longer than the period is logged and
//! handed to the port as-is.  A zero frequency passed to
//! [`PwmOut::set_frequency`] is ignored.

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use log::{debug, info, warn};

use crate::config::{DEFAULT_PWM_DUTYCYCLE, DEFAULT_PWM_FREQUENCY_HZ};
use crate::error::PwmError;
use crate::pins::PwmId;
use crate::ports::{PwmConfig, PwmPort};

const MICROS_PER_SEC: u32 = 1_000_000;

/// Period for `frequency_hz`.  Caller guarantees a non-zero frequency.
pub fn period_for(frequency_hz: u32) -> u32 {
    MICROS_PER_SEC / frequency_hz
}

/// `round(period_us × dutycycle)`; negative or NaN duty gives zero.
pub fn pulse_for(period_us: u32, dutycycle: f32) -> u32 {
    (f64::from(period_us) * f64::from(dutycycle)).round() as u32
}

pub struct PwmOut<P: PwmPort> {
    port: P,
    id: PwmId,
    config: PwmConfig,
    suspended: bool,
}

impl<P: PwmPort> PwmOut<P> {
    /// Acquire `id` at 1 kHz with the output held low.
    pub fn new(port: P, id: PwmId) -> Result<Self, PwmError> {
        Self::with_frequency(port, id, DEFAULT_PWM_FREQUENCY_HZ, DEFAULT_PWM_DUTYCYCLE)
    }

    /// Acquire `id` and start it at `frequency_hz` / `dutycycle`.
    pub fn with_frequency(
        mut port: P,
        id: PwmId,
        frequency_hz: u32,
        dutycycle: f32,
    ) -> Result<Self, PwmError> {
        if frequency_hz == 0 {
            return Err(PwmError::InvalidFrequency);
        }
        warn_if_out_of_range(id, dutycycle);

        let period_us = period_for(frequency_hz);
        let config = PwmConfig {
            period_us,
            pulse_us: pulse_for(period_us, dutycycle),
        };

        port.init(id)?;
        // From here on Drop releases the port, including on the error path.
        let mut pwm = Self {
            port,
            id,
            config,
            suspended: false,
        };
        pwm.push(config)?;

        info!(
            "pwm{}: acquired ({}Hz, period={}us pulse={}us)",
            id.0, frequency_hz, config.period_us, config.pulse_us
        );
        Ok(pwm)
    }

    /// Set frequency and duty-cycle together.  A zero frequency leaves the
    /// current configuration untouched and writes nothing.
    pub fn set_frequency(&mut self, frequency_hz: u32, dutycycle: f32) -> Result<(), PwmError> {
        if frequency_hz == 0 {
            debug!("pwm{}: zero frequency ignored", self.id.0);
            return Ok(());
        }
        warn_if_out_of_range(self.id, dutycycle);

        let period_us = period_for(frequency_hz);
        self.push(PwmConfig {
            period_us,
            pulse_us: pulse_for(period_us, dutycycle),
        })
    }

    /// Set period and pulse directly (microseconds).
    pub fn set_period(&mut self, period_us: u32, pulse_us: u32) -> Result<(), PwmError> {
        self.push(PwmConfig {
            period_us,
            pulse_us,
        })
    }

    /// Change the duty-cycle at the current period.
    pub fn set_dutycycle(&mut self, dutycycle: f32) -> Result<(), PwmError> {
        warn_if_out_of_range(self.id, dutycycle);
        self.push(PwmConfig {
            pulse_us: pulse_for(self.config.period_us, dutycycle),
            ..self.config
        })
    }

    /// Drive the output low while keeping the stored configuration.
    ///
    /// Setters called while suspended update the stored configuration only;
    /// [`resume`](Self::resume) applies the latest one.
    pub fn suspend(&mut self) -> Result<(), PwmError> {
        if self.suspended {
            return Ok(());
        }
        self.port.configure(&PwmConfig {
            period_us: self.config.period_us,
            pulse_us: 0,
        })?;
        self.suspended = true;
        debug!("pwm{}: suspended", self.id.0);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), PwmError> {
        if !self.suspended {
            return Ok(());
        }
        self.suspended = false;
        if let Err(e) = self.push(self.config) {
            self.suspended = true;
            return Err(e);
        }
        debug!("pwm{}: resumed", self.id.0);
        Ok(())
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn id(&self) -> PwmId {
        self.id
    }

    /// The port this output drives.
    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn config(&self) -> PwmConfig {
        self.config
    }

    pub fn period_us(&self) -> u32 {
        self.config.period_us
    }

    pub fn pulse_us(&self) -> u32 {
        self.config.pulse_us
    }

    /// Frequency implied by the current period (0 if the period is 0).
    pub fn frequency_hz(&self) -> u32 {
        MICROS_PER_SEC.checked_div(self.config.period_us).unwrap_or(0)
    }

    /// Duty-cycle implied by the current pulse (0.0 if the period is 0).
    pub fn dutycycle(&self) -> f32 {
        if self.config.period_us == 0 {
            return 0.0;
        }
        self.config.pulse_us as f32 / self.config.period_us as f32
    }

    /// Write `next` and adopt it.  A rejected write leaves the stored
    /// configuration as it was, matching what the hardware still runs.
    fn push(&mut self, next: PwmConfig) -> Result<(), PwmError> {
        if next.pulse_us > next.period_us {
            warn!(
                "pwm{}: pulse {}us exceeds period {}us, passing through",
                self.id.0, next.pulse_us, next.period_us
            );
        }
        if self.suspended {
            debug!("pwm{}: suspended, config stored only", self.id.0);
            self.config = next;
            return Ok(());
        }
        debug!(
            "pwm{}: period={}us pulse={}us",
            self.id.0, next.period_us, next.pulse_us
        );
        self.port.configure(&next)?;
        self.config = next;
        Ok(())
    }
}

impl<P: PwmPort> Drop for PwmOut<P> {
    fn drop(&mut self) {
        self.port.deinit();
        info!("pwm{}: released", self.id.0);
    }
}

fn warn_if_out_of_range(id: PwmId, dutycycle: f32) {
    if !(0.0..=1.0).contains(&dutycycle) {
        warn!("pwm{}: duty-cycle {} outside 0..=1, passing through", id.0, dutycycle);
    }
}

// ── embedded-hal ──────────────────────────────────────────────

impl<P: PwmPort> ErrorType for PwmOut<P> {
    type Error = PwmError;
}

/// Full scale `u16::MAX` maps onto the current period.
impl<P: PwmPort> SetDutyCycle for PwmOut<P> {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), PwmError> {
        let period = u64::from(self.config.period_us);
        self.push(PwmConfig {
            pulse_us: (period * u64::from(duty) / u64::from(u16::MAX)) as u32,
            ..self.config
        })
    }
}
