//! High-level operations exposed by the library.

pub mod diff;
