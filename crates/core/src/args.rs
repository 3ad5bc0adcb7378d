//! Native argument types and call snapshots.
//!
//! A checked function declares one `NativeType` per parameter. Callers pass `Arg`
//! values, each tagged with its own type, and a failing call records them in an
//! `ArgumentSnapshot` keyed by the declared parameter names.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// C type of a foreign function parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeType {
    /// `NiFpga_Bool` (one byte, zero or one).
    Bool,
    /// `int8_t`.
    I8,
    /// `uint8_t`.
    U8,
    /// `int16_t`.
    I16,
    /// `uint16_t`.
    U16,
    /// `int32_t`.
    I32,
    /// `uint32_t`.
    U32,
    /// `int64_t`.
    I64,
    /// `uint64_t`.
    U64,
    /// `size_t`.
    SizeT,
    /// `const char*`, a NUL-terminated byte string.
    CharPtr,
    /// Any other pointer, usually an output parameter.
    Pointer,
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "NiFpga_Bool",
            Self::I8 => "int8_t",
            Self::U8 => "uint8_t",
            Self::I16 => "int16_t",
            Self::U16 => "uint16_t",
            Self::I32 => "int32_t",
            Self::U32 => "uint32_t",
            Self::I64 => "int64_t",
            Self::U64 => "uint64_t",
            Self::SizeT => "size_t",
            Self::CharPtr => "const char*",
            Self::Pointer => "void*",
        };
        f.write_str(name)
    }
}

/// A typed argument value for a foreign call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arg {
    /// `NiFpga_Bool` value.
    Bool(bool),
    /// `int8_t` value.
    I8(i8),
    /// `uint8_t` value.
    U8(u8),
    /// `int16_t` value.
    I16(i16),
    /// `uint16_t` value.
    U16(u16),
    /// `int32_t` value.
    I32(i32),
    /// `uint32_t` value.
    U32(u32),
    /// `int64_t` value.
    I64(i64),
    /// `uint64_t` value.
    U64(u64),
    /// `size_t` value.
    SizeT(usize),
    /// Byte string passed as `const char*`.
    CharPtr(Vec<u8>),
    /// Raw address passed through untouched.
    Pointer(usize),
}

impl Arg {
    /// Type tag of this value.
    pub const fn native_type(&self) -> NativeType {
        match self {
            Self::Bool(_) => NativeType::Bool,
            Self::I8(_) => NativeType::I8,
            Self::U8(_) => NativeType::U8,
            Self::I16(_) => NativeType::I16,
            Self::U16(_) => NativeType::U16,
            Self::I32(_) => NativeType::I32,
            Self::U32(_) => NativeType::U32,
            Self::I64(_) => NativeType::I64,
            Self::U64(_) => NativeType::U64,
            Self::SizeT(_) => NativeType::SizeT,
            Self::CharPtr(_) => NativeType::CharPtr,
            Self::Pointer(_) => NativeType::Pointer,
        }
    }

    /// Integer value of any numeric, boolean, or pointer argument.
    ///
    /// Returns `None` for byte strings.
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            Self::Bool(v) => Some(i128::from(v)),
            Self::I8(v) => Some(v.into()),
            Self::U8(v) => Some(v.into()),
            Self::I16(v) => Some(v.into()),
            Self::U16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::U32(v) => Some(v.into()),
            Self::I64(v) => Some(v.into()),
            Self::U64(v) => Some(v.into()),
            Self::SizeT(v) | Self::Pointer(v) => Some(v as i128),
            Self::CharPtr(_) => None,
        }
    }

    /// Contents of a byte-string argument.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::CharPtr(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    /// Integers print in hex (`0xbeef`, `-0x5`); byte strings print quoted (`b'2'`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CharPtr(bytes) => write_bytes_repr(f, bytes),
            other => {
                let value = other.as_integer().unwrap_or_default();
                if value < 0 {
                    write!(f, "-{:#x}", value.unsigned_abs())
                } else {
                    write!(f, "{value:#x}")
                }
            }
        }
    }
}

/// Writes `bytes` as a quoted byte-string literal: `b'...'`, switching to double
/// quotes when the contents hold a single quote and no double quote.
fn write_bytes_repr(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };
    write!(f, "b{}", quote as char)?;
    for &byte in bytes {
        match byte {
            b'\\' => f.write_str("\\\\")?,
            b'\t' => f.write_str("\\t")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b if b == quote => write!(f, "\\{}", b as char)?,
            0x20..=0x7e => write!(f, "{}", byte as char)?,
            _ => write!(f, "\\x{byte:02x}")?,
        }
    }
    write!(f, "{}", quote as char)
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    usize => SizeT,
}

impl From<&[u8]> for Arg {
    fn from(value: &[u8]) -> Self {
        Self::CharPtr(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Arg {
    fn from(value: &[u8; N]) -> Self {
        Self::CharPtr(value.to_vec())
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::CharPtr(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Arg {
    fn from(value: Vec<u8>) -> Self {
        Self::CharPtr(value)
    }
}

/// Declared parameter name paired with its native type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedArgtype {
    /// Parameter name used in diagnostics.
    pub name: String,
    /// C type the foreign function expects.
    pub native_type: NativeType,
}

impl NamedArgtype {
    /// Creates a named parameter declaration.
    pub fn new(name: impl Into<String>, native_type: NativeType) -> Self {
        Self {
            name: name.into(),
            native_type,
        }
    }
}

/// Ordered `name -> value` record of the arguments a failing call received.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSnapshot {
    entries: Vec<(String, Arg)>,
}

impl ArgumentSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs declared names with the values actually passed, in call order.
    ///
    /// Extra names or extra values are ignored; the dispatcher checks arity first.
    pub fn capture<'a>(
        names: impl IntoIterator<Item = &'a str>,
        values: impl IntoIterator<Item = &'a Arg>,
    ) -> Self {
        names
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name.to_owned(), value.clone()))
            .collect()
    }

    /// Appends one argument, returning the snapshot for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// Value recorded under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value)
    }

    /// Iterates over `(name, value)` pairs in call order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Declared names in call order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of recorded arguments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no arguments were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Arg)> for ArgumentSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, Arg)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Index<&str> for ArgumentSnapshot {
    type Output = Arg;

    /// Panics if no argument named `name` was recorded.
    fn index(&self, name: &str) -> &Self::Output {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no argument named '{name}' in snapshot"),
        }
    }
}
