//! mcu-io demo — potentiometer-driven PWM with a heartbeat timer.
//!
//! ```text
//!   ADC input 0 ──► read_percent() ──► set_dutycycle() ──► PWM output 0
//!                                                           (LED / fan)
//!   timer 0 (periodic, 500 ms) ──► callback ──► tick counter
//! ```
#![deny(unused_must_use)]

use core::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use mcu_io::adapters::adc_oneshot::OneshotAdc;
use mcu_io::adapters::esp_timer::EspTimer;
use mcu_io::adapters::ledc::LedcPwm;
use mcu_io::config::PeripheralDefaults;
use mcu_io::pins::{AdcId, PwmId, TimerId};
use mcu_io::{AnalogIn, PwmOut, Timer};

static TICKS: AtomicU32 = AtomicU32::new(0);

const HEARTBEAT_MS: u32 = 500;
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const ADC_SAMPLES: u16 = 8;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  mcu-io demo v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let defaults = PeripheralDefaults::default();

    // ── 2. Peripherals ────────────────────────────────────────
    let mut pwm = PwmOut::with_frequency(
        LedcPwm::new(),
        PwmId(0),
        defaults.pwm_frequency_hz,
        defaults.pwm_dutycycle,
    )?;
    let mut pot = AnalogIn::new(OneshotAdc::new(), AdcId(0))?;
    let mut heartbeat = Timer::new(EspTimer::new(), TimerId(0))?;

    heartbeat.set_periodic(HEARTBEAT_MS, || {
        TICKS.fetch_add(1, Ordering::Relaxed);
    })?;

    info!(
        "PWM {}Hz, ADC ref {:.2}V, heartbeat {}ms",
        pwm.frequency_hz(),
        pot.reference(),
        heartbeat.period_ms()
    );

    // ── 3. Main loop ──────────────────────────────────────────
    let mut last_logged = 0;
    loop {
        match pot.read_average(ADC_SAMPLES) {
            Ok(raw) => {
                let duty = raw / f32::from(pot.max_raw_value());
                if let Err(e) = pwm.set_dutycycle(duty) {
                    warn!("PWM update failed: {}", e);
                }
            }
            Err(e) => warn!("ADC read failed: {}", e),
        }

        let ticks = TICKS.load(Ordering::Relaxed);
        if ticks != last_logged && ticks % 10 == 0 {
            info!(
                "tick {}: duty {:.1}% ({}us / {}us)",
                ticks,
                pwm.dutycycle() * 100.0,
                pwm.pulse_us(),
                pwm.period_us()
            );
            last_logged = ticks;
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}
