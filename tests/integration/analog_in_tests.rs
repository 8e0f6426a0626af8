//! AnalogIn against the recording ADC port.

use crate::mock_hal::{HalCall, MockAdc, call_log, count};

use mcu_io::AnalogIn;
use mcu_io::error::AdcError;
use mcu_io::pins::AdcId;

#[test]
fn fixed_resolution_and_reference() {
    let log = call_log();
    let adc = AnalogIn::new(MockAdc::new(&log, 0), AdcId(3)).unwrap();
    assert_eq!(adc.id(), AdcId(3));
    assert_eq!(adc.max_raw_value(), 4095);
    assert!((adc.reference() - 3.3).abs() < f32::EPSILON);
    assert_eq!(*log.borrow(), vec![HalCall::AdcInit(AdcId(3))]);
}

#[test]
fn percent_and_voltage_follow_raw() {
    let log = call_log();
    let mut adc = AnalogIn::new(MockAdc::new(&log, 4095), AdcId(0)).unwrap();

    assert_eq!(adc.read_raw_value().unwrap(), 4095);
    assert!((adc.read_percent().unwrap() - 1.0).abs() < 1e-6);
    assert!((adc.read_voltage().unwrap() - 3.3).abs() < 1e-6);
}

#[test]
fn every_read_samples_the_hardware() {
    let log = call_log();
    let mut adc =
        AnalogIn::new(MockAdc::with_samples(&log, vec![0, 4095, 1024]), AdcId(0)).unwrap();

    assert_eq!(adc.read_raw_value().unwrap(), 0);
    assert!((adc.read_percent().unwrap() - 1.0).abs() < 1e-6);
    let v = adc.read_voltage().unwrap();
    assert!((v - 3.3 * 1024.0 / 4095.0).abs() < 1e-5);

    assert_eq!(count(&log, HalCall::AdcRead), 3);
}

#[test]
fn average_takes_requested_samples() {
    let log = call_log();
    let mut adc = AnalogIn::new(MockAdc::with_samples(&log, vec![100, 300]), AdcId(0)).unwrap();

    let avg = adc.read_average(4).unwrap();
    assert!((avg - 200.0).abs() < f32::EPSILON);
    assert_eq!(count(&log, HalCall::AdcRead), 4);
}

#[test]
fn read_errors_propagate() {
    let log = call_log();
    let mut port = MockAdc::new(&log, 0);
    port.fail_reads = true;
    let mut adc = AnalogIn::new(port, AdcId(0)).unwrap();

    assert!(matches!(adc.read_raw_value(), Err(AdcError::Hal { .. })));
    assert!(adc.read_percent().is_err());
    assert!(adc.read_average(3).is_err());
}

#[test]
fn init_then_deinit_on_drop() {
    let log = call_log();
    drop(AnalogIn::new(MockAdc::new(&log, 0), AdcId(5)).unwrap());
    assert_eq!(
        *log.borrow(),
        vec![HalCall::AdcInit(AdcId(5)), HalCall::AdcDeinit]
    );
}
