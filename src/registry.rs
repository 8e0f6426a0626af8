//! Timer interrupt callback registry.
//!
//! Platform timer APIs take a C function pointer plus an opaque `void *`
//! context.  Instead of smuggling a pointer to a boxed closure through that
//! context, each [`Timer`](crate::drivers::timer::Timer) owns a
//! [`CallbackHandle`] (a plain integer) and stores its closure here.  The
//! adapter's `extern "C"` trampoline turns the context back into the
//! handle and calls [`dispatch`].
//!
//! ```text
//!   esp_timer task ──▶ trampoline(arg) ──▶ dispatch(handle) ──▶ closure
//!                                              │
//!                          SLOTS (critical-section Mutex, fixed capacity)
//! ```
//!
//! The slot table is only touched inside short critical sections; the
//! closure itself runs outside of them, so a callback may take its time
//! (within reason) without holding off interrupts.  While a callback runs
//! its slot is marked busy and a nested dispatch of the same handle is
//! dropped.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use critical_section::Mutex;
use heapless::FnvIndexMap;
use log::trace;

use crate::config::MAX_TIMER_CALLBACKS;
use crate::error::TimerError;

/// Boxed zero-argument timer callback.
pub type Callback = Box<dyn FnMut() + Send + 'static>;

/// Stable identity of one registry slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Rebuild a handle from the integer context a trampoline received.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

struct Slot {
    /// `None` only while the callback is out being run.
    callback: Option<Callback>,
    busy: bool,
}

// Handle 0 is never issued so a zeroed context can't alias a live timer.
static NEXT_HANDLE: AtomicU32 = AtomicU32::new(1);

static SLOTS: Mutex<RefCell<FnvIndexMap<u32, Slot, MAX_TIMER_CALLBACKS>>> =
    Mutex::new(RefCell::new(FnvIndexMap::new()));

/// Issue a fresh handle.  No slot is taken until [`set`] is called.
pub fn allocate() -> CallbackHandle {
    CallbackHandle(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
}

/// Store `callback` for `handle`, replacing any previous one.
pub fn set(handle: CallbackHandle, callback: Callback) -> Result<(), TimerError> {
    let previous = critical_section::with(|cs| {
        let mut slots = SLOTS.borrow_ref_mut(cs);
        if let Some(slot) = slots.get_mut(&handle.0) {
            return Ok(slot.callback.replace(callback));
        }
        slots
            .insert(
                handle.0,
                Slot {
                    callback: Some(callback),
                    busy: false,
                },
            )
            .map(|_| None)
            .map_err(|_| TimerError::RegistryFull)
    })?;

    // Drop the replaced closure outside the critical section.
    drop(previous);
    Ok(())
}

/// Free the slot for `handle`.  Returns `true` if a callback was stored.
pub fn remove(handle: CallbackHandle) -> bool {
    let removed = critical_section::with(|cs| SLOTS.borrow_ref_mut(cs).remove(&handle.0));
    removed.is_some()
}

pub fn contains(handle: CallbackHandle) -> bool {
    critical_section::with(|cs| SLOTS.borrow_ref(cs).contains_key(&handle.0))
}

/// Number of occupied slots.
pub fn len() -> usize {
    critical_section::with(|cs| SLOTS.borrow_ref(cs).len())
}

/// Run the callback stored for `handle` once.
///
/// Called from the platform trampoline.  Returns `false` when there is
/// nothing to run: no callback stored, or the callback is already running.
pub fn dispatch(handle: CallbackHandle) -> bool {
    let taken = critical_section::with(|cs| {
        let mut slots = SLOTS.borrow_ref_mut(cs);
        let slot = slots.get_mut(&handle.0)?;
        if slot.busy {
            return None;
        }
        let callback = slot.callback.take()?;
        slot.busy = true;
        Some(callback)
    });

    let Some(mut callback) = taken else {
        trace!("registry: nothing to dispatch for handle {}", handle.0);
        return false;
    };

    callback();

    // Put it back unless the slot was replaced or removed meanwhile.
    let stale = critical_section::with(|cs| {
        let mut slots = SLOTS.borrow_ref_mut(cs);
        match slots.get_mut(&handle.0) {
            Some(slot) => {
                slot.busy = false;
                if slot.callback.is_none() {
                    slot.callback = Some(callback);
                    None
                } else {
                    Some(callback)
                }
            }
            None => Some(callback),
        }
    });
    drop(stale);
    true
}
