//! Common utilities for the selcon selector tools.
//!
//! This crate provides shared infrastructure used by the library and the CLI:
//! - **Warning System** - deduplicated, colored stderr diagnostics for
//!   selector forms the containment algebra cannot decide

pub mod warning;
