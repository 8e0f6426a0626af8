//! LEDC PWM adapter — implements [`PwmPort`].
//!
//! Each PWM id owns one LEDC channel and one LEDC timer (see
//! [`pins::PWM_OUTPUTS`]), so the period of one output is independent of
//! the others.  Period/pulse are turned into a timer frequency and a
//! 10-bit duty value.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: raw `ledc_*` sys calls.
//! On host/test: remembers the last applied frequency/duty in memory.

use log::{debug, info};

use super::utils::{ledc_duty, ledc_frequency};
use crate::config::DEFAULT_PWM_FREQUENCY_HZ;
use crate::error::PwmError;
use crate::pins::{self, PwmId, PwmPin};
use crate::ports::{PwmConfig, PwmPort};

#[cfg(target_os = "espidf")]
use super::utils::esp_result;
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Frequency and duty as last written to the LEDC registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedcState {
    pub freq_hz: u32,
    pub duty: u32,
}

pub struct LedcPwm {
    pin: Option<PwmPin>,
    applied: Option<LedcState>,
}

impl Default for LedcPwm {
    fn default() -> Self {
        Self::new()
    }
}

impl LedcPwm {
    pub fn new() -> Self {
        Self {
            pin: None,
            applied: None,
        }
    }

    /// Last frequency/duty written, `None` before the first configure.
    pub fn applied(&self) -> Option<LedcState> {
        self.applied
    }

    fn resolve(&self, config: &PwmConfig) -> Result<(PwmPin, LedcState), PwmError> {
        let pin = self.pin.ok_or(PwmError::NotInitialised)?;
        let freq_hz = ledc_frequency(config.period_us)
            .ok_or(PwmError::InvalidPeriod(config.period_us))?;
        Ok((
            pin,
            LedcState {
                freq_hz,
                duty: ledc_duty(config),
            },
        ))
    }
}

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl PwmPort for LedcPwm {
    fn init(&mut self, id: PwmId) -> Result<(), PwmError> {
        let pin = pins::pwm_pin(id).ok_or(PwmError::UnknownId(id.0))?;

        let timer = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: pin.ledc_timer,
            duty_resolution: pins::PWM_RESOLUTION_BITS,
            freq_hz: DEFAULT_PWM_FREQUENCY_HZ,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: plain config struct passed by reference; main task only.
        esp_result(unsafe { ledc_timer_config(&timer) })
            .map_err(|code| PwmError::Hal {
                op: "ledc_timer_config",
                code,
            })?;

        let channel = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: pin.ledc_channel,
            timer_sel: pin.ledc_timer,
            gpio_num: pin.gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        // SAFETY: as above.
        esp_result(unsafe { ledc_channel_config(&channel) })
            .map_err(|code| PwmError::Hal {
                op: "ledc_channel_config",
                code,
            })?;

        self.pin = Some(pin);
        self.applied = Some(LedcState {
            freq_hz: DEFAULT_PWM_FREQUENCY_HZ,
            duty: 0,
        });
        info!(
            "ledc: GPIO{} on CH{} / timer {}",
            pin.gpio, pin.ledc_channel, pin.ledc_timer
        );
        Ok(())
    }

    fn configure(&mut self, config: &PwmConfig) -> Result<(), PwmError> {
        let (pin, next) = self.resolve(config)?;

        if self.applied.map(|s| s.freq_hz) != Some(next.freq_hz) {
            // SAFETY: timer configured in init(); main task only.
            esp_result(unsafe {
                ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, pin.ledc_timer, next.freq_hz)
            })
            .map_err(|code| PwmError::Hal {
                op: "ledc_set_freq",
                code,
            })?;
        }

        // SAFETY: channel configured in init(); duty register writes are
        // race-free since each channel has exactly one owner.
        unsafe {
            esp_result(ledc_set_duty(
                ledc_mode_t_LEDC_LOW_SPEED_MODE,
                pin.ledc_channel,
                next.duty,
            ))
            .map_err(|code| PwmError::Hal {
                op: "ledc_set_duty",
                code,
            })?;
            esp_result(ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, pin.ledc_channel))
                .map_err(|code| PwmError::Hal {
                    op: "ledc_update_duty",
                    code,
                })?;
        }

        debug!("ledc: CH{} {}Hz duty={}", pin.ledc_channel, next.freq_hz, next.duty);
        self.applied = Some(next);
        Ok(())
    }

    fn deinit(&mut self) {
        let Some(pin) = self.pin.take() else {
            return;
        };
        // SAFETY: channel/timer configured in init(); released exactly once.
        unsafe {
            let rc = ledc_stop(ledc_mode_t_LEDC_LOW_SPEED_MODE, pin.ledc_channel, 0);
            if let Err(rc) = esp_result(rc) {
                log::error!("ledc: stop CH{} failed (rc={})", pin.ledc_channel, rc);
            }
            let rc = ledc_timer_pause(ledc_mode_t_LEDC_LOW_SPEED_MODE, pin.ledc_timer);
            if let Err(rc) = esp_result(rc) {
                log::error!("ledc: pause timer {} failed (rc={})", pin.ledc_timer, rc);
            }
        }
        self.applied = None;
        info!("ledc: CH{} released", pin.ledc_channel);
    }
}

// ── Simulation ────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl PwmPort for LedcPwm {
    fn init(&mut self, id: PwmId) -> Result<(), PwmError> {
        let pin = pins::pwm_pin(id).ok_or(PwmError::UnknownId(id.0))?;
        self.pin = Some(pin);
        self.applied = Some(LedcState {
            freq_hz: DEFAULT_PWM_FREQUENCY_HZ,
            duty: 0,
        });
        info!("ledc(sim): GPIO{} on CH{}", pin.gpio, pin.ledc_channel);
        Ok(())
    }

    fn configure(&mut self, config: &PwmConfig) -> Result<(), PwmError> {
        let (pin, next) = self.resolve(config)?;
        debug!("ledc(sim): CH{} {}Hz duty={}", pin.ledc_channel, next.freq_hz, next.duty);
        self.applied = Some(next);
        Ok(())
    }

    fn deinit(&mut self) {
        if let Some(pin) = self.pin.take() {
            info!("ledc(sim): CH{} released", pin.ledc_channel);
        }
        self.applied = None;
    }
}
