//! PwmOut against the recording PWM port.

use crate::mock_hal::{HalCall, MockPwm, call_log, pwm_writes};

use mcu_io::PwmOut;
use mcu_io::error::PwmError;
use mcu_io::pins::PwmId;
use mcu_io::ports::PwmConfig;

fn cfg(period_us: u32, pulse_us: u32) -> PwmConfig {
    PwmConfig {
        period_us,
        pulse_us,
    }
}

#[test]
fn new_pushes_default_configuration() {
    let log = call_log();
    let pwm = PwmOut::new(MockPwm::new(&log), PwmId(2)).unwrap();

    assert_eq!(pwm.id(), PwmId(2));
    assert_eq!(pwm.frequency_hz(), 1_000);
    assert_eq!(pwm.dutycycle(), 0.0);
    assert_eq!(
        *log.borrow(),
        vec![HalCall::PwmInit(PwmId(2)), HalCall::PwmConfigure(cfg(1_000, 0))]
    );
}

#[test]
fn set_frequency_derives_period_and_pulse() {
    let log = call_log();
    let mut pwm = PwmOut::new(MockPwm::new(&log), PwmId(0)).unwrap();

    pwm.set_frequency(50, 0.075).unwrap();
    assert_eq!(pwm.period_us(), 20_000);
    assert_eq!(pwm.pulse_us(), 1_500);

    pwm.set_frequency(3, 0.5).unwrap();
    assert_eq!(pwm.period_us(), 333_333);
    assert_eq!(pwm.pulse_us(), 166_667);

    assert_eq!(
        pwm_writes(&log),
        vec![cfg(1_000, 0), cfg(20_000, 1_500), cfg(333_333, 166_667)]
    );
}

#[test]
fn zero_frequency_setter_writes_nothing() {
    let log = call_log();
    let mut pwm = PwmOut::with_frequency(MockPwm::new(&log), PwmId(0), 200, 0.5).unwrap();
    let before = pwm.config();

    pwm.set_frequency(0, 0.9).unwrap();

    assert_eq!(pwm.config(), before);
    assert_eq!(pwm_writes(&log), vec![cfg(5_000, 2_500)]);
}

#[test]
fn zero_frequency_constructor_is_rejected() {
    let log = call_log();
    let result = PwmOut::with_frequency(MockPwm::new(&log), PwmId(0), 0, 0.5);
    assert!(matches!(result, Err(PwmError::InvalidFrequency)));
    assert!(log.borrow().is_empty(), "nothing may be acquired");
}

#[test]
fn set_dutycycle_uses_current_period() {
    let log = call_log();
    let mut pwm = PwmOut::new(MockPwm::new(&log), PwmId(0)).unwrap();

    pwm.set_period(4_000, 100).unwrap();
    pwm.set_dutycycle(0.25).unwrap();

    assert_eq!(pwm.config(), cfg(4_000, 1_000));
    assert_eq!(pwm.frequency_hz(), 250);
    assert!((pwm.dutycycle() - 0.25).abs() < 1e-6);
}

#[test]
fn out_of_range_values_pass_through() {
    let log = call_log();
    let mut pwm = PwmOut::new(MockPwm::new(&log), PwmId(0)).unwrap();

    pwm.set_dutycycle(1.5).unwrap();
    assert_eq!(pwm.pulse_us(), 1_500);

    pwm.set_period(1_000, 2_000).unwrap();
    assert_eq!(pwm_writes(&log).last(), Some(&cfg(1_000, 2_000)));

    pwm.set_dutycycle(-0.5).unwrap();
    assert_eq!(pwm.pulse_us(), 0);
}

#[test]
fn drop_releases_output_last() {
    let log = call_log();
    {
        let mut pwm = PwmOut::new(MockPwm::new(&log), PwmId(1)).unwrap();
        pwm.set_dutycycle(0.5).unwrap();
    }
    let calls = log.borrow();
    assert_eq!(calls.first(), Some(&HalCall::PwmInit(PwmId(1))));
    assert_eq!(calls.last(), Some(&HalCall::PwmDeinit));
    assert_eq!(calls.iter().filter(|c| **c == HalCall::PwmDeinit).count(), 1);
}

#[test]
fn configure_failure_at_construction_still_releases() {
    let log = call_log();
    let result = PwmOut::new(MockPwm::failing(&log), PwmId(0));
    assert!(matches!(result, Err(PwmError::Hal { .. })));
    assert_eq!(
        *log.borrow(),
        vec![HalCall::PwmInit(PwmId(0)), HalCall::PwmDeinit]
    );
}

#[test]
fn rejected_write_keeps_previous_configuration() {
    let log = call_log();
    // Call 0 is the constructor's write; reject the first setter.
    let mut pwm =
        PwmOut::with_frequency(MockPwm::failing_once(&log, 1), PwmId(0), 1_000, 0.5).unwrap();

    assert!(pwm.set_period(0, 0).is_err());
    assert_eq!(pwm.config(), cfg(1_000, 500));
    assert_eq!(pwm.frequency_hz(), 1_000);

    // The output can still be driven from the period the hardware holds.
    pwm.set_dutycycle(0.25).unwrap();
    assert_eq!(pwm_writes(&log), vec![cfg(1_000, 500), cfg(1_000, 250)]);
}

#[test]
fn rejected_duty_write_keeps_pulse() {
    let log = call_log();
    let mut pwm =
        PwmOut::with_frequency(MockPwm::failing_once(&log, 1), PwmId(0), 500, 0.5).unwrap();

    assert!(pwm.set_dutycycle(0.9).is_err());
    assert_eq!(pwm.pulse_us(), 1_000);
    assert!((pwm.dutycycle() - 0.5).abs() < 1e-6);
}
