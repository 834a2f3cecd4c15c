//! Test support for projdeps
//!
//! Compiled for unit tests and for downstream crates enabling the
//! `test-utils` feature:
//! - Dependency tree builders ([`fixtures`])
//! - The in-memory registry lives in [`crate::registry::mock`]

pub mod fixtures;

pub use fixtures::{dep, dep_with_site, host, hostless_dep, leaf};
