//! NiFpga status registry.
//!
//! This module defines the static status-code table consulted after every checked
//! foreign call. It provides:
//! 1. **Status Table:** A closed `Status` enum with one variant per known NiFpga status.
//! 2. **Severity:** Classification of a raw code as error (negative) or warning (positive).
//! 3. **Registry:** A process-wide, read-only map from signed code to `StatusCodeEntry`.
//!
//! Each table row names a status and its magnitude. The negative code is the error
//! form and the positive code the warning form; `0` is success and never appears in
//! the registry.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Symbolic name reported for codes that are not in the registry.
pub const UNKNOWN_CODE_STRING: &str = "Unknown";

macro_rules! status_table {
    ($($(#[$doc:meta])* $name:ident = $magnitude:literal,)+) => {
        /// A known NiFpga status, independent of severity.
        ///
        /// The same variant describes both `-magnitude` (error) and `+magnitude`
        /// (warning).
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Status {
            $($(#[$doc])* $name,)+
        }

        impl Status {
            /// Every known status, in table order.
            pub const ALL: &'static [Self] = &[$(Self::$name,)+];

            /// Symbolic name of the status, e.g. `"FifoTimeout"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)+
                }
            }

            /// Absolute value of the status code.
            pub const fn magnitude(self) -> i32 {
                match self {
                    $(Self::$name => $magnitude,)+
                }
            }
        }
    };
}

status_table! {
    /// A FIFO read or write timed out before the requested elements were available.
    FifoTimeout = 50400,
    /// A transfer was aborted by another operation.
    TransferAborted = 50405,
    /// A memory allocation failed.
    MemoryFull = 52000,
    /// An unexpected software error occurred.
    SoftwareFault = 52003,
    /// A parameter to a function was not valid.
    InvalidParameter = 52005,
    /// A required resource was not found.
    ResourceNotFound = 52006,
    /// A required resource was not properly initialized.
    ResourceNotInitialized = 52010,
    /// The FPGA is already running.
    FpgaAlreadyRunning = 61003,
    /// An error occurred downloading the VI to the FPGA device.
    DownloadError = 61018,
    /// The bitfile was not compiled for the specified resource's device type.
    DeviceTypeMismatch = 61024,
    /// An error was detected in the communication between the host and the FPGA.
    CommunicationTimeout = 61046,
    /// The timeout expired before any of the IRQs were asserted.
    IrqTimeout = 61060,
    /// The specified bitfile is invalid or corrupt.
    CorruptBitfile = 61070,
    /// The requested FIFO depth is invalid.
    BadDepth = 61072,
    /// The number of FIFO elements is invalid.
    BadReadWriteCount = 61073,
    /// A hardware clocking error occurred.
    ClockLostLock = 61083,
    /// The operation could not be performed because the FPGA is busy.
    FpgaBusy = 61141,
    /// An unexpected internal error occurred.
    InternalError = 61499,
    /// Access to the remote system was denied.
    AccessDenied = 63033,
    /// The version of the host API does not match the target's.
    HostVersionMismatch = 63038,
    /// A connection could not be established to the remote system.
    RpcConnectionError = 63040,
    /// The RPC server reported an error.
    RpcServerError = 63042,
    /// A fault on the network caused the operation to fail.
    NetworkFault = 63043,
    /// The specified resource name is invalid.
    InvalidResourceName = 63101,
    /// The requested feature is not supported.
    FeatureNotSupported = 63106,
    /// The NI-RIO software on the remote system is not compatible with the local software.
    VersionMismatch = 63150,
    /// The session is invalid or has been closed.
    InvalidSession = 63195,
    /// The maximum number of open FPGA sessions was reached.
    OutOfHandles = 63198,
}

impl Status {
    /// Finds the status whose magnitude is `magnitude`.
    pub fn from_magnitude(magnitude: i32) -> Option<Self> {
        BY_MAGNITUDE.get(&magnitude).copied()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity of a non-zero status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Negative code; the call failed.
    Error,
    /// Positive code; the call completed but something deserves attention.
    Warning,
}

impl Severity {
    /// Classifies a raw status code. Returns `None` for success (`0`).
    pub const fn of(code: i32) -> Option<Self> {
        if code < 0 {
            Some(Self::Error)
        } else if code > 0 {
            Some(Self::Warning)
        } else {
            None
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// One row of the registry: a signed code with its name and severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusCodeEntry {
    /// Signed status code as returned by the foreign call.
    pub code: i32,
    /// Status this code belongs to.
    pub status: Status,
    /// Error for negative codes, warning for positive ones.
    pub severity: Severity,
}

impl StatusCodeEntry {
    /// Symbolic name of the entry, e.g. `"MemoryFull"`.
    pub const fn name(&self) -> &'static str {
        self.status.name()
    }
}

/// Which concrete condition a status code maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// A code present in the registry.
    Known(Status),
    /// A non-zero code absent from the registry.
    Unknown,
}

impl StatusKind {
    /// Resolves a raw code against the registry.
    pub fn of(code: i32) -> Self {
        lookup(code).map_or(Self::Unknown, |entry| Self::Known(entry.status))
    }

    /// Symbolic name, or `"Unknown"` for the fallback kind.
    pub const fn code_string(self) -> &'static str {
        match self {
            Self::Known(status) => status.name(),
            Self::Unknown => UNKNOWN_CODE_STRING,
        }
    }
}

lazy_static! {
    static ref BY_MAGNITUDE: HashMap<i32, Status> = Status::ALL
        .iter()
        .map(|status| (status.magnitude(), *status))
        .collect();
    static ref REGISTRY: HashMap<i32, StatusCodeEntry> = Status::ALL
        .iter()
        .flat_map(|&status| {
            let magnitude = status.magnitude();
            [
                StatusCodeEntry {
                    code: -magnitude,
                    status,
                    severity: Severity::Error,
                },
                StatusCodeEntry {
                    code: magnitude,
                    status,
                    severity: Severity::Warning,
                },
            ]
        })
        .map(|entry| (entry.code, entry))
        .collect();
}

/// Looks up a signed status code.
///
/// Returns `None` for `0` and for any code missing from the table; callers decide
/// between the unknown-error and unknown-warning fallbacks from the sign.
pub fn lookup(code: i32) -> Option<StatusCodeEntry> {
    REGISTRY.get(&code).copied()
}

/// Number of signed codes in the registry (two per status).
pub fn registry_len() -> usize {
    REGISTRY.len()
}
