//! Non-fatal notices.
//!
//! Status warnings and fixed-point coercions never abort the operation that produced
//! them. They are handed to a `NoticeSink` instead: `TracingSink` logs them, and
//! `RecordingSink` keeps them for later inspection.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use bigdecimal::BigDecimal;
use tracing::warn;

use crate::error::StatusWarning;

/// Something worth reporting that did not stop the operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// A checked call returned a positive status.
    Status(StatusWarning),
    /// A write to an overflow-enabled register ran before any read set the overflow state.
    OverflowUnset {
        /// Register name.
        register: String,
    },
    /// A written value was below the representable range and was coerced to zero.
    ValueBelowRange {
        /// Register name.
        register: String,
        /// Value the caller asked to write.
        value: BigDecimal,
    },
    /// A written value was above the representable range and was clamped to the maximum.
    ValueAboveRange {
        /// Register name.
        register: String,
        /// Value the caller asked to write.
        value: BigDecimal,
    },
}

impl Notice {
    /// The status warning carried by this notice, if any.
    pub const fn as_status(&self) -> Option<&StatusWarning> {
        match self {
            Self::Status(warning) => Some(warning),
            _ => None,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(warning) => write!(f, "{warning}"),
            Self::OverflowUnset { register } => write!(
                f,
                "{register}: overflow state not explicitly set; defaulting to false"
            ),
            Self::ValueBelowRange { register, value } => write!(
                f,
                "{register}: value {value} is below the representable range; coerced to zero"
            ),
            Self::ValueAboveRange { register, value } => write!(
                f,
                "{register}: value {value} is above the representable range; coerced to the maximum"
            ),
        }
    }
}

/// Destination for notices.
pub trait NoticeSink: Send + Sync {
    /// Reports one notice.
    fn emit(&self, notice: Notice);
}

/// Logs every notice at `WARN` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    fn emit(&self, notice: Notice) {
        match &notice {
            Notice::Status(warning) => warn!(
                code = warning.code(),
                function = warning.function_name(),
                "{notice}"
            ),
            _ => warn!("{notice}"),
        }
    }
}

/// Collects notices in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notices recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies of the recorded notices, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    /// Removes and returns every recorded notice.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NoticeSink for RecordingSink {
    fn emit(&self, notice: Notice) {
        self.lock().push(notice);
    }
}

/// The sink used when none is configured.
pub fn default_sink() -> Arc<dyn NoticeSink> {
    Arc::new(TracingSink)
}
