//! # FXP Configuration Tests
//!
//! Register construction, derived quantities, and deserialization of register
//! descriptions.

use nifpga_core::{FxpConfig, FxpError, FxpRegister};
use pretty_assertions::assert_eq;

use crate::common::harness::{dec, pow2};

#[test]
fn derived_quantities_follow_the_config() {
    let reg = FxpRegister::new("Mixed", FxpConfig::new(true, true, 32, 16)).expect("valid");
    assert_eq!(reg.name(), "Mixed");
    assert_eq!(reg.radix_point(), 16);
    assert_eq!(reg.word_length(), 32);
    assert_eq!(reg.integer_word_length(), 16);
    assert_eq!(reg.bit_width(), 33);
    assert!(reg.is_signed());
    assert!(reg.overflow_enabled());
    assert_eq!(reg.delta(), &dec("0.0000152587890625"));
}

#[test]
fn delta_is_exact_for_extreme_integer_word_lengths() {
    let tiny = FxpRegister::new("Tiny", FxpConfig::new(false, false, 16, -100)).expect("valid");
    assert_eq!(tiny.delta(), &pow2(-116));

    let huge = FxpRegister::new("Huge", FxpConfig::new(false, false, 16, 100)).expect("valid");
    assert_eq!(huge.delta(), &pow2(84));
}

#[test]
fn zero_word_length_is_rejected() {
    let err = FxpRegister::new("Empty", FxpConfig::new(false, false, 0, 0)).unwrap_err();
    assert_eq!(
        err,
        FxpError::ZeroWordLength {
            register: "Empty".to_owned()
        }
    );
    assert_eq!(err.to_string(), "register 'Empty' has a word length of zero");
}

#[test]
fn config_deserializes_from_snake_case() {
    let json = r#"{
        "signed": true,
        "overflow_enabled": true,
        "word_length": 15,
        "integer_word_length": 0
    }"#;
    let config: FxpConfig = serde_json::from_str(json).expect("valid json");
    assert_eq!(config, FxpConfig::new(true, true, 15, 0));
}

#[test]
fn config_deserializes_from_bitfile_attribute_names() {
    let json = r#"{
        "signed": false,
        "enableOverflowStatus": true,
        "wordLength": 64,
        "integerWordLength": -3
    }"#;
    let config: FxpConfig = serde_json::from_str(json).expect("valid json");
    assert_eq!(config, FxpConfig::new(false, true, 64, -3));
    assert_eq!(config.delta_exponent(), -67);
}

#[test]
fn overflow_status_defaults_to_disabled() {
    let json = r#"{ "signed": false, "wordLength": 8, "integerWordLength": 8 }"#;
    let config: FxpConfig = serde_json::from_str(json).expect("valid json");
    assert!(!config.overflow_enabled);
    assert_eq!(config.bit_width(), 8);
}

#[test]
fn config_round_trips_through_json() {
    let config = FxpConfig::new(true, false, 24, 100);
    let json = serde_json::to_string(&config).expect("serializable");
    let back: FxpConfig = serde_json::from_str(&json).expect("valid json");
    assert_eq!(back, config);
}
