//! # Unit Tests
//!
//! One module per subsystem of the crate.

/// Argument values, type tags, and snapshots.
pub mod args;
