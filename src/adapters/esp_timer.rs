//! `esp_timer` adapter — implements [`TimerPort`].
//!
//! The timer is created in [`attach`](TimerPort::attach) with the
//! registry handle as its `arg`.  The value travels through the C side as
//! an integer and is never dereferenced; the trampoline turns it back into
//! a [`CallbackHandle`] and calls [`registry::dispatch`].
//!
//! Callbacks are dispatched from the ESP timer task (not ISR context), so
//! the registry's critical sections stay short and nothing runs with
//! interrupts masked for the length of a user callback.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `esp_timer_*` sys calls.
//! On host/test: tracks armed state in memory; [`EspTimer::sim_fire`]
//! plays the role of the expiry.

use log::{debug, info};

use crate::drivers::timer::TimerMode;
use crate::error::TimerError;
use crate::pins::{self, TimerId};
use crate::ports::{TimerConfig, TimerPort};
use crate::registry::{self, CallbackHandle};

#[cfg(target_os = "espidf")]
use super::utils::esp_result;
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct EspTimer {
    name: Option<&'static str>,
    config: Option<TimerConfig>,
    attached: Option<CallbackHandle>,
    #[cfg(not(target_os = "espidf"))]
    armed: bool,
    #[cfg(target_os = "espidf")]
    raw: esp_timer_handle_t,
}

impl Default for EspTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl EspTimer {
    pub fn new() -> Self {
        Self {
            name: None,
            config: None,
            attached: None,
            #[cfg(not(target_os = "espidf"))]
            armed: false,
            #[cfg(target_os = "espidf")]
            raw: core::ptr::null_mut(),
        }
    }

    fn period_us(&self) -> u64 {
        self.config.map_or(0, |c| u64::from(c.period_ms) * 1_000)
    }

    fn label(&self) -> &'static str {
        self.name.map_or("?", |n| n.trim_end_matches('\0'))
    }
}

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn trampoline(arg: *mut core::ffi::c_void) {
    // `arg` is the handle value, not an address.
    registry::dispatch(CallbackHandle::from_raw(arg as usize as u32));
}

#[cfg(target_os = "espidf")]
impl EspTimer {
    /// Whether the hardware timer is counting.  A one-shot that has fired
    /// reports `false`.
    pub fn is_armed(&self) -> bool {
        // SAFETY: self.raw is either null (checked) or a live handle.
        !self.raw.is_null() && unsafe { esp_timer_is_active(self.raw) }
    }

    fn disarm(&mut self) -> Result<(), TimerError> {
        if self.raw.is_null() {
            return Ok(());
        }
        // SAFETY: self.raw is a live handle created in attach().
        let rc = unsafe { esp_timer_stop(self.raw) };
        // INVALID_STATE: not running (e.g. a one-shot that already fired).
        if rc != ESP_ERR_INVALID_STATE as i32 {
            esp_result(rc).map_err(|code| TimerError::Hal {
                op: "esp_timer_stop",
                code,
            })?;
        }
        Ok(())
    }

    fn delete(&mut self) {
        if self.raw.is_null() {
            return;
        }
        if let Err(e) = self.disarm() {
            log::error!("esp_timer: {} stop failed: {}", self.label(), e);
        }
        // SAFETY: stopped above; handle is not used after this.
        if let Err(rc) = esp_result(unsafe { esp_timer_delete(self.raw) }) {
            log::error!("esp_timer: {} delete failed (rc={})", self.label(), rc);
        }
        self.raw = core::ptr::null_mut();
    }
}

#[cfg(target_os = "espidf")]
impl TimerPort for EspTimer {
    fn init(&mut self, id: TimerId) -> Result<(), TimerError> {
        let name = pins::timer_name(id).ok_or(TimerError::UnknownId(id.0))?;
        self.name = Some(name);
        info!("esp_timer: {} acquired", self.label());
        Ok(())
    }

    fn configure(&mut self, config: &TimerConfig) -> Result<(), TimerError> {
        self.config = Some(*config);
        Ok(())
    }

    fn attach(&mut self, handle: CallbackHandle) -> Result<(), TimerError> {
        let name = self.name.ok_or(TimerError::NotInitialised)?;
        self.delete();

        let args = esp_timer_create_args_t {
            callback: Some(trampoline),
            arg: core::ptr::without_provenance_mut(handle.raw() as usize),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: name.as_ptr().cast(),
            skip_unhandled_events: false,
        };
        // SAFETY: args outlives the call; name is a 'static NUL-terminated str.
        esp_result(unsafe { esp_timer_create(&args, &mut self.raw) })
            .map_err(|code| TimerError::Hal {
                op: "esp_timer_create",
                code,
            })?;

        self.attached = Some(handle);
        debug!("esp_timer: {} attached to handle {}", self.label(), handle.raw());
        Ok(())
    }

    fn start(&mut self) -> Result<(), TimerError> {
        if self.raw.is_null() {
            return Err(TimerError::NotAttached);
        }
        self.disarm()?;

        let period_us = self.period_us();
        let one_shot = matches!(self.config.map(|c| c.mode), Some(TimerMode::OneShot));
        // SAFETY: self.raw is a live, stopped handle.
        let rc = unsafe {
            if one_shot {
                esp_timer_start_once(self.raw, period_us)
            } else {
                esp_timer_start_periodic(self.raw, period_us)
            }
        };
        esp_result(rc).map_err(|code| TimerError::Hal {
            op: "esp_timer_start",
            code,
        })?;

        debug!("esp_timer: {} armed ({}us)", self.label(), period_us);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TimerError> {
        self.disarm()
    }

    fn reset_count(&mut self) -> Result<(), TimerError> {
        // esp_timer has no counter register; re-arming restarts the period.
        if self.is_armed() {
            self.start()
        } else {
            Ok(())
        }
    }

    fn deinit(&mut self) {
        self.delete();
        self.attached = None;
        info!("esp_timer: {} released", self.label());
    }
}

// ── Simulation ────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl EspTimer {
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Simulate one expiry.  Returns whether a callback ran.
    ///
    /// Does nothing unless the timer is armed; a one-shot disarms itself.
    pub fn sim_fire(&mut self) -> bool {
        let Some(handle) = self.attached.filter(|_| self.armed) else {
            return false;
        };
        if matches!(self.config.map(|c| c.mode), Some(TimerMode::OneShot)) {
            self.armed = false;
        }
        registry::dispatch(handle)
    }
}

#[cfg(not(target_os = "espidf"))]
impl TimerPort for EspTimer {
    fn init(&mut self, id: TimerId) -> Result<(), TimerError> {
        let name = pins::timer_name(id).ok_or(TimerError::UnknownId(id.0))?;
        self.name = Some(name);
        info!("esp_timer(sim): {} acquired", self.label());
        Ok(())
    }

    fn configure(&mut self, config: &TimerConfig) -> Result<(), TimerError> {
        self.config = Some(*config);
        Ok(())
    }

    fn attach(&mut self, handle: CallbackHandle) -> Result<(), TimerError> {
        if self.name.is_none() {
            return Err(TimerError::NotInitialised);
        }
        self.attached = Some(handle);
        Ok(())
    }

    fn start(&mut self) -> Result<(), TimerError> {
        if self.attached.is_none() {
            return Err(TimerError::NotAttached);
        }
        self.armed = true;
        debug!("esp_timer(sim): {} armed ({}us)", self.label(), self.period_us());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TimerError> {
        self.armed = false;
        Ok(())
    }

    fn reset_count(&mut self) -> Result<(), TimerError> {
        Ok(())
    }

    fn deinit(&mut self) {
        self.armed = false;
        self.attached = None;
        info!("esp_timer(sim): {} released", self.label());
    }
}
