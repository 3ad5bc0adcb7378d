//! NiFpga interop core.
//!
//! This crate implements the two pieces of an NiFpga client that need exact semantics:
//! 1. **Status Checking:** A registry of NiFpga status codes, typed error and warning
//!    conditions that remember the failing call's arguments, and a dispatcher that
//!    validates, invokes, and status-checks foreign functions.
//! 2. **Fixed-Point Conversion:** Exact conversion between FXP register bit patterns and
//!    decimal values for any word length and integer word length, with an optional
//!    overflow-status bit.
//!
//! Non-fatal conditions (status warnings, coerced register writes) are reported through
//! a [`notice::NoticeSink`], which logs via `tracing` by default.

/// Native argument types, values, and call snapshots.
pub mod args;
/// Status-checked call dispatch.
pub mod dispatch;
/// Status conditions and error types.
pub mod error;
/// Fixed-point register conversion.
pub mod fxp;
/// `dlsym`-backed library and native call trampoline.
#[cfg(all(unix, target_pointer_width = "64"))]
pub mod native;
/// Non-fatal notice reporting.
pub mod notice;
/// NiFpga status registry.
pub mod status;

pub use crate::args::{Arg, ArgumentSnapshot, NamedArgtype, NativeType};
pub use crate::dispatch::{
    CheckedFunction, ForeignFunction, Library, LibraryFunctionInfo, StatusCheckedLibrary,
    SymbolTable, check_status,
};
pub use crate::error::{
    Condition, DispatchError, FxpError, StatusCondition, StatusError, StatusWarning,
};
pub use crate::fxp::{BitString, FxpConfig, FxpRegister};
#[cfg(all(unix, target_pointer_width = "64"))]
pub use crate::native::NativeLibrary;
pub use crate::notice::{Notice, NoticeSink, RecordingSink, TracingSink};
pub use crate::status::{Severity, Status, StatusCodeEntry, StatusKind};
