//! Infrastructure layer - storage and integrations.
//!
//! This layer provides:
//! - Edge storage for trie nodes (atomic slot promoting to a sharded map)
//! - Test doubles for the `tracing` integration

pub(crate) mod edges;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// tracing-template-cache = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
