//! Mock implementations for testing.
//!
//! This module provides test doubles for observing the cache's own
//! diagnostics.

pub mod layer;

pub use layer::MockCaptureLayer;
