//! Fixed-point (FXP) register conversion.
//!
//! This module converts between raw FXP register bit patterns and exact decimal values.
//! It provides:
//! 1. **Configuration:** `FxpConfig`, the signedness, overflow-status flag, word length,
//!    and integer word length of one register.
//! 2. **Read Path:** `FxpRegister::decode` strips the optional overflow bit, applies the
//!    two's-complement correction, and scales by the register's delta.
//! 3. **Write Path:** `FxpRegister::encode` rounds to the nearest representable step,
//!    coerces out-of-range values, and renders the exact bit string to write.
//!
//! All arithmetic is exact: `delta = 2^(integer_word_length - word_length)` is a
//! terminating decimal, so products and quotients by powers of two never round.
//!
//! The last decoded overflow bit is kept on the register and reused by `encode`;
//! concurrent use of one register must be serialized by the caller.

use std::fmt;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::FxpError;
use crate::notice::{Notice, NoticeSink, default_sink};

/// Shape of a fixed-point register.
///
/// Deserializes from either snake_case keys or the bitfile attribute spellings
/// (`enableOverflowStatus`, `wordLength`, `integerWordLength`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FxpConfig {
    /// Two's-complement value field when `true`.
    pub signed: bool,
    /// An extra overflow bit sits above the value field.
    #[serde(default, alias = "enableOverflowStatus", alias = "overflowEnabled")]
    pub overflow_enabled: bool,
    /// Bits in the value field, excluding the overflow bit.
    #[serde(alias = "wordLength")]
    pub word_length: u32,
    /// Position of the binary point counted from the low end; may be negative or
    /// exceed `word_length`.
    #[serde(alias = "integerWordLength")]
    pub integer_word_length: i32,
}

impl FxpConfig {
    /// Creates a configuration.
    pub const fn new(
        signed: bool,
        overflow_enabled: bool,
        word_length: u32,
        integer_word_length: i32,
    ) -> Self {
        Self {
            signed,
            overflow_enabled,
            word_length,
            integer_word_length,
        }
    }

    /// Exponent of the least significant bit: `integer_word_length - word_length`.
    pub const fn delta_exponent(&self) -> i64 {
        self.integer_word_length as i64 - self.word_length as i64
    }

    /// Width of a raw register value, including the overflow bit.
    pub const fn bit_width(&self) -> u32 {
        self.word_length + self.overflow_enabled as u32
    }
}

/// A bit string, most significant bit first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitString(String);

impl BitString {
    /// The bits as `'0'`/`'1'` characters.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a zero-length string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The bits read as an unsigned integer.
    pub fn to_biguint(&self) -> BigUint {
        self.0.bytes().fold(BigUint::zero(), |acc, bit| {
            (acc << 1u8) + BigUint::from(u8::from(bit == b'1'))
        })
    }

    /// Unwraps the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for BitString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BitString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for BitString {
    fn eq(&self, other: &String) -> bool {
        &self.0 == other
    }
}

/// A fixed-point register descriptor with its last-read overflow state.
pub struct FxpRegister {
    name: String,
    config: FxpConfig,
    delta: BigDecimal,
    overflow: Option<bool>,
    notices: Arc<dyn NoticeSink>,
}

impl FxpRegister {
    /// Creates a register descriptor.
    ///
    /// # Arguments
    ///
    /// * `name` - Register name used in notices.
    /// * `config` - Register shape.
    ///
    /// # Returns
    ///
    /// The descriptor, or `FxpError::ZeroWordLength` if the value field is empty.
    pub fn new(name: impl Into<String>, config: FxpConfig) -> Result<Self, FxpError> {
        let name = name.into();
        if config.word_length == 0 {
            return Err(FxpError::ZeroWordLength { register: name });
        }
        Ok(Self {
            delta: scale_by_power_of_two(BigInt::one(), config.delta_exponent()),
            name,
            config,
            overflow: None,
            notices: default_sink(),
        })
    }

    /// Sends coercion and overflow-state notices to `notices`.
    #[must_use]
    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register shape.
    pub const fn config(&self) -> &FxpConfig {
        &self.config
    }

    /// Returns `true` for a two's-complement register.
    pub const fn is_signed(&self) -> bool {
        self.config.signed
    }

    /// Returns `true` if an overflow bit sits above the value field.
    pub const fn overflow_enabled(&self) -> bool {
        self.config.overflow_enabled
    }

    /// Bits in the value field.
    pub const fn word_length(&self) -> u32 {
        self.config.word_length
    }

    /// Configured integer word length.
    pub const fn integer_word_length(&self) -> i32 {
        self.config.integer_word_length
    }

    /// Bit position of the binary point; equal to the integer word length.
    pub const fn radix_point(&self) -> i32 {
        self.config.integer_word_length
    }

    /// Value of the least significant bit.
    pub const fn delta(&self) -> &BigDecimal {
        &self.delta
    }

    /// Width of a raw register value, including the overflow bit.
    pub const fn bit_width(&self) -> u32 {
        self.config.bit_width()
    }

    /// Overflow bit from the most recent `decode`; `None` before the first read.
    pub const fn overflow(&self) -> Option<bool> {
        self.overflow
    }

    /// Sets the overflow bit the next `encode` writes.
    pub fn set_overflow(&mut self, overflow: bool) {
        self.overflow = Some(overflow);
    }

    /// Smallest representable value.
    pub fn minimum(&self) -> BigDecimal {
        self.scale(self.min_magnitude())
    }

    /// Largest representable value.
    pub fn maximum(&self) -> BigDecimal {
        self.scale(self.max_magnitude())
    }

    /// Converts a raw register value to its decimal value.
    ///
    /// With the overflow status enabled, bit `word_length` is the overflow flag: it is
    /// recorded on the register (replacing the previous read's flag) and excluded from
    /// the value. Bits above the raw width are ignored.
    ///
    /// # Arguments
    ///
    /// * `raw` - Unsigned value read from the register.
    ///
    /// # Returns
    ///
    /// `magnitude * delta`, computed exactly.
    pub fn decode(&mut self, raw: impl Into<BigUint>) -> BigDecimal {
        let raw = raw.into();
        let word_length = u64::from(self.config.word_length);

        if self.config.overflow_enabled {
            self.overflow = Some(raw.bit(word_length));
        }

        let field = raw & low_mask(word_length);
        let negative = self.config.signed && field.bit(word_length - 1);
        let mut magnitude = BigInt::from(field);
        if negative {
            magnitude -= BigInt::one() << word_length;
        }
        trace!(register = %self.name, %magnitude, overflow = ?self.overflow, "decoded fxp value");
        self.scale(magnitude)
    }

    /// Converts a decimal value to the bit string to write to the register.
    ///
    /// The value is divided by delta and rounded half-to-even. A result below the
    /// representable range emits `Notice::ValueBelowRange` and encodes as zero; one
    /// above it emits `Notice::ValueAboveRange` and encodes as the maximum. With the
    /// overflow status enabled, the last-read overflow bit is prepended; if no read
    /// or `set_overflow` has happened yet, `Notice::OverflowUnset` is emitted and a
    /// `0` is prepended.
    ///
    /// # Arguments
    ///
    /// * `value` - Value to write.
    ///
    /// # Returns
    ///
    /// A bit string of `word_length` bits, plus one when the overflow status is enabled.
    pub fn encode(&self, value: &BigDecimal) -> BitString {
        let word_length = self.config.word_length;
        let steps = round_half_even(&scale_by_power_of_two_decimal(
            value,
            -self.config.delta_exponent(),
        ));

        let magnitude = if steps < self.min_magnitude() {
            self.notices.emit(Notice::ValueBelowRange {
                register: self.name.clone(),
                value: value.clone(),
            });
            BigInt::zero()
        } else if steps > self.max_magnitude() {
            self.notices.emit(Notice::ValueAboveRange {
                register: self.name.clone(),
                value: value.clone(),
            });
            self.max_magnitude()
        } else {
            steps
        };

        let pattern = if magnitude.is_negative() {
            magnitude + (BigInt::one() << word_length)
        } else {
            magnitude
        };
        let digits = pattern.to_str_radix(2);

        let mut bits = String::with_capacity(self.bit_width() as usize);
        if self.config.overflow_enabled {
            let overflow = self.overflow.unwrap_or_else(|| {
                self.notices.emit(Notice::OverflowUnset {
                    register: self.name.clone(),
                });
                false
            });
            bits.push(if overflow { '1' } else { '0' });
        }
        for _ in digits.len()..word_length as usize {
            bits.push('0');
        }
        bits.push_str(&digits);
        BitString(bits)
    }

    /// Same as `encode`, with the bit string read as an unsigned integer.
    pub fn encode_raw(&self, value: &BigDecimal) -> BigUint {
        self.encode(value).to_biguint()
    }

    fn scale(&self, magnitude: BigInt) -> BigDecimal {
        scale_by_power_of_two(magnitude, self.config.delta_exponent())
    }

    fn min_magnitude(&self) -> BigInt {
        if self.config.signed {
            -(BigInt::one() << (self.config.word_length - 1))
        } else {
            BigInt::zero()
        }
    }

    fn max_magnitude(&self) -> BigInt {
        let bits = if self.config.signed {
            self.config.word_length - 1
        } else {
            self.config.word_length
        };
        (BigInt::one() << bits) - 1
    }
}

impl fmt::Debug for FxpRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FxpRegister")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("delta", &self.delta)
            .field("overflow", &self.overflow)
            .finish_non_exhaustive()
    }
}

/// `(1 << bits) - 1`.
fn low_mask(bits: u64) -> BigUint {
    (BigUint::one() << bits) - 1u8
}

/// `2^exponent` as an exact decimal: `2^-n` is written as `5^n * 10^-n`.
fn power_of_two(exponent: i64) -> BigDecimal {
    if exponent >= 0 {
        BigDecimal::new(BigInt::one() << exponent as u64, 0)
    } else {
        let n = exponent.unsigned_abs();
        BigDecimal::new(BigInt::from(5u8).pow(n as u32), n as i64)
    }
}

/// `magnitude * 2^exponent`, exact.
fn scale_by_power_of_two(magnitude: BigInt, exponent: i64) -> BigDecimal {
    BigDecimal::new(magnitude, 0) * power_of_two(exponent)
}

/// `value * 2^exponent`, exact.
fn scale_by_power_of_two_decimal(value: &BigDecimal, exponent: i64) -> BigDecimal {
    value.clone() * power_of_two(exponent)
}

/// Rounds to the nearest integer, ties to even.
fn round_half_even(value: &BigDecimal) -> BigInt {
    let (digits, scale) = value.as_bigint_and_exponent();
    if scale <= 0 {
        return digits * BigInt::from(10u8).pow(scale.unsigned_abs() as u32);
    }

    let divisor = BigInt::from(10u8).pow(scale as u32);
    let quotient = &digits / &divisor;
    let twice_remainder = (&digits % &divisor).abs() * 2u8;
    let away = match twice_remainder.cmp(&divisor) {
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => quotient.bit(0),
    };
    if !away {
        quotient
    } else if digits.is_negative() {
        quotient - 1
    } else {
        quotient + 1
    }
}
