//! # Overflow State Tests
//!
//! The overflow bit of an overflow-enabled register is recorded on every read,
//! kept out of the two's-complement value, and written back by the next write.

use std::sync::Arc;

use nifpga_core::{FxpConfig, FxpRegister, Notice};

use crate::common::harness::{BINARY_STRING_16BIT, bits, dec, register};
use crate::common::mocks::notice::MockSink;

#[test]
fn overflow_is_only_set_after_read() {
    let (mut reg, _sink) = register(false, true, 15, 15);
    assert_eq!(reg.overflow(), None);

    let raw = bits(&format!("1{}", "0".repeat(15)));
    let _ = reg.decode(raw);
    assert_eq!(reg.overflow(), Some(true));
}

#[test]
fn overflow_bit_is_not_part_of_twos_complement() {
    // overflow(1) 111 1111 1111 1111 -> -1 with overflow set.
    let (mut reg, _sink) = register(true, true, 15, 15);
    let actual = reg.decode(bits(&"1".repeat(16)));
    assert_eq!(reg.overflow(), Some(true));
    assert_eq!(actual, dec("-1"));
}

#[test]
fn every_read_overwrites_the_previous_flag() {
    let (mut reg, _sink) = register(false, true, 15, 15);
    let _ = reg.decode(bits(BINARY_STRING_16BIT));
    assert_eq!(reg.overflow(), Some(true));

    let _ = reg.decode(bits(&BINARY_STRING_16BIT[1..]));
    assert_eq!(reg.overflow(), Some(false));
}

#[test]
fn register_without_overflow_status_never_records_it() {
    let (mut reg, _sink) = register(false, false, 16, 16);
    let _ = reg.decode(bits(BINARY_STRING_16BIT));
    assert_eq!(reg.overflow(), None);
    assert_eq!(reg.encode(&dec("58518")).len(), 16);
}

#[test]
fn write_without_read_warns_once_and_clears_overflow_bit() {
    let mut sink = MockSink::new();
    let _ = sink
        .expect_emit()
        .withf(|notice| matches!(notice, Notice::OverflowUnset { register } if register == "Unread"))
        .times(1)
        .return_const(());

    let reg = FxpRegister::new("Unread", FxpConfig::new(false, true, 15, 15))
        .expect("valid config")
        .with_notices(Arc::new(sink));

    let actual = reg.encode(&dec("25750"));
    assert_eq!(actual, format!("0{}", &BINARY_STRING_16BIT[1..]));
}

#[test]
fn write_without_read_is_recorded_by_recording_sink() {
    let (reg, sink) = register(false, true, 15, 15);
    let _ = reg.encode(&dec("25750"));
    let notices = sink.take();
    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], Notice::OverflowUnset { .. }));
}

#[test]
fn write_after_read_reuses_the_read_flag() {
    let (mut reg, sink) = register(false, true, 15, 15);
    let value = reg.decode(bits(BINARY_STRING_16BIT));
    assert_eq!(reg.encode(&value), BINARY_STRING_16BIT);
    assert!(sink.is_empty());
}

#[test]
fn encode_does_not_change_overflow_state() {
    let (reg, _sink) = register(true, true, 15, 0);
    let _ = reg.encode(&dec("0.5"));
    assert_eq!(reg.overflow(), None);
}
