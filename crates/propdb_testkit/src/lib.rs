//! # propdb Testkit
//!
//! Test utilities for propdb.
//!
//! This crate provides:
//! - Record fixtures and a frozen clock
//! - Property-based test generators using proptest
//! - Hex helpers for byte-level assertions
//! - Wire format test vectors
//! - Tracing setup for test runs
//!
//! ## Usage
//!
//! ```
//! use propdb_testkit::prelude::*;
//!
//! let (player, clock) = player("abc");
//! assert_eq!(player.entity().group_id(), 54);
//! assert_eq!(clock.now(), frozen_instant());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod golden;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
    pub use crate::vectors::*;
    pub use crate::init_tracing;
    pub use propdb_core::{Clock, Record};
}

pub use fixtures::*;
pub use generators::*;
pub use golden::*;
pub use vectors::*;

/// Installs a test subscriber honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
