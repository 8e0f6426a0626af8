//! Analog input façade.
//!
//! Resolution and reference voltage are fixed board constants; every read
//! takes a fresh sample through the [`AdcPort`], nothing is cached.

use log::info;

use crate::config::{ADC_REFERENCE_V, ADC_RESOLUTION};
use crate::error::AdcError;
use crate::pins::AdcId;
use crate::ports::AdcPort;

/// Fraction of full scale for a raw count.
pub fn raw_to_percent(raw: u16) -> f32 {
    f32::from(raw) / f32::from(ADC_RESOLUTION)
}

/// Voltage for a raw count against the fixed reference.
pub fn raw_to_voltage(raw: u16) -> f32 {
    ADC_REFERENCE_V * raw_to_percent(raw)
}

pub struct AnalogIn<A: AdcPort> {
    port: A,
    id: AdcId,
}

impl<A: AdcPort> AnalogIn<A> {
    pub fn new(mut port: A, id: AdcId) -> Result<Self, AdcError> {
        port.init(id)?;
        info!("adc{}: acquired", id.0);
        Ok(Self { port, id })
    }

    pub fn id(&self) -> AdcId {
        self.id
    }

    pub fn port(&self) -> &A {
        &self.port
    }

    /// Full-scale raw count.
    pub fn max_raw_value(&self) -> u16 {
        ADC_RESOLUTION
    }

    /// Reference voltage in volts.
    pub fn reference(&self) -> f32 {
        ADC_REFERENCE_V
    }

    pub fn read_raw_value(&mut self) -> Result<u16, AdcError> {
        self.port.read()
    }

    /// Sample as a fraction of full scale.
    pub fn read_percent(&mut self) -> Result<f32, AdcError> {
        self.read_raw_value().map(raw_to_percent)
    }

    pub fn read_voltage(&mut self) -> Result<f32, AdcError> {
        self.read_raw_value().map(raw_to_voltage)
    }

    /// Mean of `samples` fresh raw reads (at least one).
    pub fn read_average(&mut self, samples: u16) -> Result<f32, AdcError> {
        let n = samples.max(1);
        let mut sum = 0u32;
        for _ in 0..n {
            sum += u32::from(self.read_raw_value()?);
        }
        Ok(sum as f32 / f32::from(n))
    }
}

impl<A: AdcPort> Drop for AnalogIn<A> {
    fn drop(&mut self) {
        self.port.deinit();
        info!("adc{}: released", self.id.0);
    }
}
