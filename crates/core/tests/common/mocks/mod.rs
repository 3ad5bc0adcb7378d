//! Mockall doubles for the dispatch and notice seams.


/// Mock notice sink.
pub mod notice;
