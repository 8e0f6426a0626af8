//! ADC oneshot adapter — implements [`AdcPort`].
//!
//! ESP-IDF allows one oneshot handle per ADC unit, while several analog
//! inputs may sit on the same unit.  Unit handles are therefore shared
//! through a small reference-counted table: the first input on a unit
//! creates the handle, the last one to be released deletes it.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `adc_oneshot_*` sys calls, 12-bit, 12 dB attenuation.
//! On host/test: reads from a per-input `AtomicU16` set via [`sim_set_raw`].

use log::info;

use crate::error::AdcError;
use crate::pins::{self, AdcId, AdcPin};
use crate::ports::AdcPort;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use super::utils::esp_result;
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct OneshotAdc {
    /// Set between init and deinit.
    id: Option<AdcId>,
    pin: Option<AdcPin>,
    #[cfg(target_os = "espidf")]
    unit: adc_oneshot_unit_handle_t,
}

impl Default for OneshotAdc {
    fn default() -> Self {
        Self::new()
    }
}

impl OneshotAdc {
    pub fn new() -> Self {
        Self {
            id: None,
            pin: None,
            #[cfg(target_os = "espidf")]
            unit: core::ptr::null_mut(),
        }
    }

    /// Input currently held, if any.
    pub fn id(&self) -> Option<AdcId> {
        self.id
    }
}

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
struct UnitSlot {
    handle: adc_oneshot_unit_handle_t,
    users: u8,
}

// SAFETY: the handle is an opaque driver token; every access goes through
// the UNITS mutex.
#[cfg(target_os = "espidf")]
unsafe impl Send for UnitSlot {}

#[cfg(target_os = "espidf")]
static UNITS: std::sync::Mutex<[UnitSlot; 2]> = std::sync::Mutex::new([
    UnitSlot {
        handle: core::ptr::null_mut(),
        users: 0,
    },
    UnitSlot {
        handle: core::ptr::null_mut(),
        users: 0,
    },
]);

#[cfg(target_os = "espidf")]
fn units() -> std::sync::MutexGuard<'static, [UnitSlot; 2]> {
    UNITS.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(target_os = "espidf")]
fn acquire_unit(unit: pins::AdcUnit) -> Result<adc_oneshot_unit_handle_t, AdcError> {
    let mut slots = units();
    let slot = &mut slots[unit.index()];
    if slot.users == 0 {
        let cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: match unit {
                pins::AdcUnit::Adc1 => adc_unit_t_ADC_UNIT_1,
                pins::AdcUnit::Adc2 => adc_unit_t_ADC_UNIT_2,
            },
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        // SAFETY: slot.handle is only written here, under the UNITS lock.
        esp_result(unsafe { adc_oneshot_new_unit(&cfg, &mut slot.handle) })
            .map_err(|code| AdcError::Hal {
                op: "adc_oneshot_new_unit",
                code,
            })?;
        info!("adc_oneshot: {:?} unit created", unit);
    }
    slot.users += 1;
    Ok(slot.handle)
}

#[cfg(target_os = "espidf")]
fn release_unit(unit: pins::AdcUnit) {
    let mut slots = units();
    let slot = &mut slots[unit.index()];
    slot.users = slot.users.saturating_sub(1);
    if slot.users == 0 && !slot.handle.is_null() {
        // SAFETY: last user; no reads can be in flight on this unit.
        if let Err(rc) = esp_result(unsafe { adc_oneshot_del_unit(slot.handle) }) {
            log::error!("adc_oneshot: delete {:?} failed (rc={})", unit, rc);
        }
        slot.handle = core::ptr::null_mut();
        info!("adc_oneshot: {:?} unit deleted", unit);
    }
}

#[cfg(target_os = "espidf")]
impl AdcPort for OneshotAdc {
    fn init(&mut self, id: AdcId) -> Result<(), AdcError> {
        let pin = pins::adc_pin(id).ok_or(AdcError::UnknownId(id.0))?;
        let unit = acquire_unit(pin.unit)?;

        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        // SAFETY: unit handle is live for as long as we hold a user count.
        let rc = unsafe { adc_oneshot_config_channel(unit, pin.channel, &chan_cfg) };
        if let Err(code) = esp_result(rc) {
            release_unit(pin.unit);
            return Err(AdcError::Hal {
                op: "adc_oneshot_config_channel",
                code,
            });
        }

        self.id = Some(id);
        self.pin = Some(pin);
        self.unit = unit;
        info!("adc_oneshot: GPIO{} ({:?} CH{})", pin.gpio, pin.unit, pin.channel);
        Ok(())
    }

    fn read(&mut self) -> Result<u16, AdcError> {
        let pin = self.pin.ok_or(AdcError::NotInitialised)?;
        let mut raw: i32 = 0;
        // SAFETY: unit handle is live while self.pin is Some.
        esp_result(unsafe { adc_oneshot_read(self.unit, pin.channel, &mut raw) })
            .map_err(|code| AdcError::Hal {
                op: "adc_oneshot_read",
                code,
            })?;
        Ok(raw.max(0) as u16)
    }

    fn deinit(&mut self) {
        self.id = None;
        if let Some(pin) = self.pin.take() {
            release_unit(pin.unit);
            self.unit = core::ptr::null_mut();
        }
    }
}

// ── Simulation ────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_RAW: [AtomicU16; pins::ADC_INPUTS.len()] =
    [const { AtomicU16::new(0) }; pins::ADC_INPUTS.len()];

/// Set the value the simulated input `id` will read.  Unknown ids are
/// ignored.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_raw(id: AdcId, raw: u16) {
    if let Some(slot) = SIM_RAW.get(id.0 as usize) {
        slot.store(raw, Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
impl AdcPort for OneshotAdc {
    fn init(&mut self, id: AdcId) -> Result<(), AdcError> {
        let pin = pins::adc_pin(id).ok_or(AdcError::UnknownId(id.0))?;
        self.id = Some(id);
        self.pin = Some(pin);
        info!("adc_oneshot(sim): GPIO{} ({:?} CH{})", pin.gpio, pin.unit, pin.channel);
        Ok(())
    }

    fn read(&mut self) -> Result<u16, AdcError> {
        let id = self.id.ok_or(AdcError::NotInitialised)?;
        Ok(SIM_RAW[id.0 as usize].load(Ordering::Relaxed))
    }

    fn deinit(&mut self) {
        self.id = None;
        self.pin = None;
    }
}
