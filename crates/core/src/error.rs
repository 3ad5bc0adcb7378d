//! Status conditions and error types.
//!
//! This module defines everything a checked call or register conversion can report. It provides:
//! 1. **Status Conditions:** `StatusError` and `StatusWarning`, built from a non-zero status,
//!    the failing function's name, and a snapshot of its arguments.
//! 2. **Dispatch Errors:** Programmer errors (arity, argument type, unknown names) kept
//!    distinct from status-derived failures.
//! 3. **Codec Errors:** Invalid fixed-point register configurations.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::args::{ArgumentSnapshot, NativeType};
use crate::status::{Severity, Status, StatusKind};

/// Shared payload of a status error or warning.
///
/// Carries the raw code, the registry classification, the name of the foreign
/// symbol that returned it, and the arguments that symbol was called with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCondition {
    code: i32,
    kind: StatusKind,
    function_name: String,
    args: ArgumentSnapshot,
}

impl StatusCondition {
    /// Builds a condition, classifying `code` against the registry.
    pub fn new(code: i32, function_name: impl Into<String>, args: ArgumentSnapshot) -> Self {
        Self {
            code,
            kind: StatusKind::of(code),
            function_name: function_name.into(),
            args,
        }
    }

    /// Raw status code.
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Symbolic status name, or `"Unknown"`.
    pub const fn code_string(&self) -> &'static str {
        self.kind.code_string()
    }

    /// Registry classification of the code.
    pub const fn kind(&self) -> StatusKind {
        self.kind
    }

    /// The known status, or `None` for the unknown fallback.
    pub const fn status(&self) -> Option<Status> {
        match self.kind {
            StatusKind::Known(status) => Some(status),
            StatusKind::Unknown => None,
        }
    }

    /// Returns `true` for the unknown-error/unknown-warning fallback.
    pub const fn is_unknown(&self) -> bool {
        matches!(self.kind, StatusKind::Unknown)
    }

    /// Name of the foreign symbol that returned the status.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Arguments of the failing call, by declared name.
    pub const fn args(&self) -> &ArgumentSnapshot {
        &self.args
    }
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error: {} ({}) when calling '{}' with arguments:",
            self.code_string(),
            self.code,
            self.function_name
        )?;
        for (name, value) in self.args.iter() {
            write!(f, "\n\t{name}: {value}")?;
        }
        Ok(())
    }
}

/// A negative status returned by a checked call.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{0}")]
pub struct StatusError(StatusCondition);

/// A positive status returned by a checked call; reported as a notice, never raised.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{0}")]
pub struct StatusWarning(StatusCondition);

impl StatusError {
    /// Wraps a condition as an error.
    pub const fn new(condition: StatusCondition) -> Self {
        Self(condition)
    }

    /// Unwraps the shared payload.
    pub fn into_condition(self) -> StatusCondition {
        self.0
    }
}

impl StatusWarning {
    /// Wraps a condition as a warning.
    pub const fn new(condition: StatusCondition) -> Self {
        Self(condition)
    }

    /// Unwraps the shared payload.
    pub fn into_condition(self) -> StatusCondition {
        self.0
    }
}

impl Deref for StatusError {
    type Target = StatusCondition;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for StatusWarning {
    type Target = StatusCondition;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A status-derived condition of either severity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Built from a negative code.
    Error(StatusError),
    /// Built from a positive code.
    Warning(StatusWarning),
}

impl Condition {
    /// Builds the matching (or unknown) condition for a non-zero status.
    ///
    /// Returns `None` for success.
    pub fn build(code: i32, function_name: impl Into<String>, args: ArgumentSnapshot) -> Option<Self> {
        let severity = Severity::of(code)?;
        let condition = StatusCondition::new(code, function_name, args);
        Some(match severity {
            Severity::Error => Self::Error(StatusError(condition)),
            Severity::Warning => Self::Warning(StatusWarning(condition)),
        })
    }

    /// Severity derived from the sign of the code.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Error(_) => Severity::Error,
            Self::Warning(_) => Severity::Warning,
        }
    }
}

impl Deref for Condition {
    type Target = StatusCondition;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Error(error) => error,
            Self::Warning(warning) => warning,
        }
    }
}

/// Errors raised by the call dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The caller supplied the wrong number of arguments.
    #[error("{symbol} takes exactly {expected} arguments ({given} given)")]
    ArgumentCount {
        /// Symbol name in the library.
        symbol: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        given: usize,
    },

    /// An argument's type differs from the declared parameter type.
    #[error("{symbol} argument {position} ('{name}') must be {expected}, got {actual}")]
    ArgumentType {
        /// Symbol name in the library.
        symbol: String,
        /// Declared parameter name.
        name: String,
        /// Zero-based parameter position.
        position: usize,
        /// Declared type.
        expected: NativeType,
        /// Type of the supplied value.
        actual: NativeType,
    },

    /// The native trampoline cannot marshal this many arguments.
    #[error("{symbol} was given {given} arguments; native calls support at most {max}")]
    TooManyArguments {
        /// Symbol name in the library.
        symbol: String,
        /// Supplied argument count.
        given: usize,
        /// Largest supported arity.
        max: usize,
    },

    /// No function was registered under this pretty name.
    #[error("no function named '{0}' is registered")]
    UnknownFunction(String),

    /// The library does not export the requested symbol.
    #[error("symbol '{symbol}' not found in library '{library}'")]
    SymbolNotFound {
        /// Library the lookup ran against.
        library: String,
        /// Missing symbol.
        symbol: String,
    },

    /// The foreign call returned an error status.
    #[error(transparent)]
    Status(#[from] StatusError),
}

impl DispatchError {
    /// The status error, if this failure came from the foreign call itself.
    pub const fn as_status(&self) -> Option<&StatusError> {
        match self {
            Self::Status(error) => Some(error),
            _ => None,
        }
    }
}

/// Errors raised when constructing a fixed-point register.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FxpError {
    /// The value field must hold at least one bit.
    #[error("register '{register}' has a word length of zero")]
    ZeroWordLength {
        /// Register name.
        register: String,
    },
}
