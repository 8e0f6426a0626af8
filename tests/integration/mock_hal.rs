//! Mock HAL ports for integration tests.
//!
//! Every port appends to one shared call log so tests can assert on the
//! exact sequence of HAL operations a façade issued, across peripherals.

use std::cell::RefCell;
use std::rc::Rc;

use mcu_io::drivers::timer::TimerMode;
use mcu_io::error::{AdcError, PwmError, TimerError};
use mcu_io::pins::{AdcId, PwmId, TimerId};
use mcu_io::ports::{AdcPort, PwmConfig, PwmPort, TimerConfig, TimerPort};
use mcu_io::registry::{self, CallbackHandle};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HalCall {
    PwmInit(PwmId),
    PwmConfigure(PwmConfig),
    PwmDeinit,
    AdcInit(AdcId),
    AdcRead,
    AdcDeinit,
    TimerInit(TimerId),
    TimerConfigure(TimerConfig),
    TimerAttach(CallbackHandle),
    TimerStart,
    TimerStop,
    TimerReset,
    TimerDeinit,
}

pub type CallLog = Rc<RefCell<Vec<HalCall>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Every PWM configuration written, in order.
#[allow(dead_code)]
pub fn pwm_writes(log: &CallLog) -> Vec<PwmConfig> {
    log.borrow()
        .iter()
        .filter_map(|c| match c {
            HalCall::PwmConfigure(cfg) => Some(*cfg),
            _ => None,
        })
        .collect()
}

#[allow(dead_code)]
pub fn count(log: &CallLog, call: HalCall) -> usize {
    log.borrow().iter().filter(|c| **c == call).count()
}

// ── MockPwm ───────────────────────────────────────────────────

pub struct MockPwm {
    log: CallLog,
    pub fail_configure: bool,
    /// Reject only the configure call with this index (0 = first).
    pub fail_on: Option<usize>,
    configures: usize,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Rc::clone(log),
            fail_configure: false,
            fail_on: None,
            configures: 0,
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            fail_configure: true,
            ..Self::new(log)
        }
    }

    /// Accepts every configure except call number `n`.
    pub fn failing_once(log: &CallLog, n: usize) -> Self {
        Self {
            fail_on: Some(n),
            ..Self::new(log)
        }
    }
}

impl PwmPort for MockPwm {
    fn init(&mut self, id: PwmId) -> Result<(), PwmError> {
        self.log.borrow_mut().push(HalCall::PwmInit(id));
        Ok(())
    }

    fn configure(&mut self, config: &PwmConfig) -> Result<(), PwmError> {
        let n = self.configures;
        self.configures += 1;
        if self.fail_configure || self.fail_on == Some(n) {
            return Err(PwmError::Hal {
                op: "mock_configure",
                code: -1,
            });
        }
        self.log.borrow_mut().push(HalCall::PwmConfigure(*config));
        Ok(())
    }

    fn deinit(&mut self) {
        self.log.borrow_mut().push(HalCall::PwmDeinit);
    }
}

// ── MockAdc ───────────────────────────────────────────────────

/// Cycles through a fixed list of raw samples.
pub struct MockAdc {
    log: CallLog,
    samples: Vec<u16>,
    next: usize,
    pub fail_reads: bool,
}

#[allow(dead_code)]
impl MockAdc {
    pub fn new(log: &CallLog, raw: u16) -> Self {
        Self::with_samples(log, vec![raw])
    }

    pub fn with_samples(log: &CallLog, samples: Vec<u16>) -> Self {
        assert!(!samples.is_empty());
        Self {
            log: Rc::clone(log),
            samples,
            next: 0,
            fail_reads: false,
        }
    }
}

impl AdcPort for MockAdc {
    fn init(&mut self, id: AdcId) -> Result<(), AdcError> {
        self.log.borrow_mut().push(HalCall::AdcInit(id));
        Ok(())
    }

    fn read(&mut self) -> Result<u16, AdcError> {
        self.log.borrow_mut().push(HalCall::AdcRead);
        if self.fail_reads {
            return Err(AdcError::Hal {
                op: "mock_read",
                code: -1,
            });
        }
        let raw = self.samples[self.next % self.samples.len()];
        self.next += 1;
        Ok(raw)
    }

    fn deinit(&mut self) {
        self.log.borrow_mut().push(HalCall::AdcDeinit);
    }
}

// ── MockTimer ─────────────────────────────────────────────────

#[derive(Default)]
struct TimerState {
    handle: Option<CallbackHandle>,
    config: Option<TimerConfig>,
    armed: bool,
    reject_configure: bool,
}

pub struct MockTimer {
    log: CallLog,
    state: Rc<RefCell<TimerState>>,
}

/// Test-side view of a [`MockTimer`] owned by a `Timer`.
#[derive(Clone)]
pub struct TimerHw {
    state: Rc<RefCell<TimerState>>,
}

impl MockTimer {
    pub fn new(log: &CallLog) -> (Self, TimerHw) {
        let state = Rc::new(RefCell::new(TimerState::default()));
        let hw = TimerHw {
            state: Rc::clone(&state),
        };
        (
            Self {
                log: Rc::clone(log),
                state,
            },
            hw,
        )
    }
}

#[allow(dead_code)]
impl TimerHw {
    /// Simulate one hardware expiry.  Returns whether a callback ran.
    pub fn fire(&self) -> bool {
        let handle = {
            let mut s = self.state.borrow_mut();
            if !s.armed {
                return false;
            }
            if matches!(s.config.map(|c| c.mode), Some(TimerMode::OneShot)) {
                s.armed = false;
            }
            s.handle
        };
        handle.is_some_and(registry::dispatch)
    }

    pub fn is_armed(&self) -> bool {
        self.state.borrow().armed
    }

    pub fn attached(&self) -> Option<CallbackHandle> {
        self.state.borrow().handle
    }

    /// Make the next `configure` fail.
    pub fn reject_next_configure(&self) {
        self.state.borrow_mut().reject_configure = true;
    }
}

impl TimerPort for MockTimer {
    fn init(&mut self, id: TimerId) -> Result<(), TimerError> {
        self.log.borrow_mut().push(HalCall::TimerInit(id));
        Ok(())
    }

    fn configure(&mut self, config: &TimerConfig) -> Result<(), TimerError> {
        let mut s = self.state.borrow_mut();
        if core::mem::take(&mut s.reject_configure) {
            return Err(TimerError::Hal {
                op: "mock_configure",
                code: -1,
            });
        }
        self.log.borrow_mut().push(HalCall::TimerConfigure(*config));
        s.config = Some(*config);
        Ok(())
    }

    fn attach(&mut self, handle: CallbackHandle) -> Result<(), TimerError> {
        self.log.borrow_mut().push(HalCall::TimerAttach(handle));
        self.state.borrow_mut().handle = Some(handle);
        Ok(())
    }

    fn start(&mut self) -> Result<(), TimerError> {
        self.log.borrow_mut().push(HalCall::TimerStart);
        self.state.borrow_mut().armed = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TimerError> {
        self.log.borrow_mut().push(HalCall::TimerStop);
        self.state.borrow_mut().armed = false;
        Ok(())
    }

    fn reset_count(&mut self) -> Result<(), TimerError> {
        self.log.borrow_mut().push(HalCall::TimerReset);
        Ok(())
    }

    fn deinit(&mut self) {
        self.log.borrow_mut().push(HalCall::TimerDeinit);
        let mut s = self.state.borrow_mut();
        s.armed = false;
        s.handle = None;
    }
}
