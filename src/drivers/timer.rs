//! Hardware timer façade with an interrupt callback.
//!
//! ```text
//!   idle ──start──▶ running ──stop──▶ stopped ──start──▶ running …
//! ```
//!
//! Mode (one-shot / periodic) is orthogonal to the running state.  The
//! callback lives in the [`registry`](crate::registry) under the timer's
//! [`CallbackHandle`]; the port's trampoline is attached once at
//! construction, so replacing the callback or reconfiguring the period
//! never re-registers anything with the platform.
//!
//! ## Interrupt context
//!
//! The callback runs asynchronously to the main program (the `esp_timer`
//! task on ESP-IDF).  It must not block.  State it shares with the main
//! program needs its own synchronisation (atomics, critical sections),
//! and reconfiguring a `Timer` while its callback is running is the
//! caller's responsibility.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_TIMER_MODE, DEFAULT_TIMER_PERIOD_MS};
use crate::error::TimerError;
use crate::pins::TimerId;
use crate::ports::{TimerConfig, TimerPort};
use crate::registry::{self, CallbackHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerMode {
    /// Fire once per `start`.
    OneShot,
    /// Fire every period until stopped.
    Periodic,
}

pub struct Timer<T: TimerPort> {
    port: T,
    id: TimerId,
    config: TimerConfig,
    handle: CallbackHandle,
    running: bool,
}

impl<T: TimerPort> Timer<T> {
    /// Acquire `id`, push the default configuration and attach the
    /// trampoline.  The timer is idle and has no callback.
    pub fn new(mut port: T, id: TimerId) -> Result<Self, TimerError> {
        port.init(id)?;
        let mut timer = Self {
            port,
            id,
            config: TimerConfig {
                mode: DEFAULT_TIMER_MODE,
                period_ms: DEFAULT_TIMER_PERIOD_MS,
            },
            handle: registry::allocate(),
            running: false,
        };
        timer.port.configure(&timer.config)?;
        timer.port.attach(timer.handle)?;

        info!("timer{}: acquired (handle {})", id.0, timer.handle.raw());
        Ok(timer)
    }

    /// Install `callback`, apply `period_ms` / `mode`, and start the timer
    /// if `start` is set.
    ///
    /// With `start == false` a running timer is stopped; an idle one is
    /// left alone.  If the port rejects the new configuration the previous
    /// mode and period stay in force (the callback is already replaced).
    pub fn set_interrupt<F>(
        &mut self,
        period_ms: u32,
        mode: TimerMode,
        start: bool,
        callback: F,
    ) -> Result<(), TimerError>
    where
        F: FnMut() + Send + 'static,
    {
        registry::set(self.handle, Box::new(callback))?;

        // Adopt the new mode/period only once the port has accepted it.
        let next = TimerConfig { mode, period_ms };
        self.port.configure(&next)?;
        self.config = next;
        debug!("timer{}: {:?} every {}ms", self.id.0, mode, period_ms);

        if start {
            self.start()
        } else {
            self.stop()
        }
    }

    /// Periodic interrupt every `period_ms`, started immediately.
    pub fn set_periodic<F>(&mut self, period_ms: u32, callback: F) -> Result<(), TimerError>
    where
        F: FnMut() + Send + 'static,
    {
        self.set_interrupt(period_ms, TimerMode::Periodic, true, callback)
    }

    /// Start (or re-arm) with the current configuration.
    pub fn start(&mut self) -> Result<(), TimerError> {
        self.port.start()?;
        self.running = true;
        Ok(())
    }

    /// Stop a running timer.  No-op when idle.
    pub fn stop(&mut self) -> Result<(), TimerError> {
        if !self.running {
            return Ok(());
        }
        self.port.stop()?;
        self.running = false;
        Ok(())
    }

    /// Restart counting from zero; mode, period and callback are kept.
    pub fn reset(&mut self) -> Result<(), TimerError> {
        self.port.reset_count()
    }

    /// Drop the callback.  Later expiries do nothing.
    pub fn clear_interrupt(&mut self) -> bool {
        registry::remove(self.handle)
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn port(&self) -> &T {
        &self.port
    }

    /// Mutable port access, e.g. to drive a simulated expiry.  Reconfiguring
    /// the port behind the façade's back leaves its state stale.
    pub fn port_mut(&mut self) -> &mut T {
        &mut self.port
    }

    pub fn handle(&self) -> CallbackHandle {
        self.handle
    }

    pub fn mode(&self) -> TimerMode {
        self.config.mode
    }

    pub fn period_ms(&self) -> u32 {
        self.config.period_ms
    }

    /// Whether the façade last started the timer.  A one-shot that has
    /// already fired still reports `true` until stopped or restarted.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_callback(&self) -> bool {
        registry::contains(self.handle)
    }
}

impl<T: TimerPort> Drop for Timer<T> {
    fn drop(&mut self) {
        // Release the hardware first so no expiry races the slot removal.
        self.port.deinit();
        registry::remove(self.handle);
        info!("timer{}: released", self.id.0);
    }
}
