//! Domain layer - pure data types with no concurrency concerns.
//!
//! This layer contains the values the template cache produces and consumes:
//! - Template segments and capture sigils
//! - Formatted-hole keys
//! - Runtime hole values
//! - Materialized templates and built messages
//!
//! All types in this layer are immutable once built and easily testable.

pub mod format_key;
pub mod segment;
pub mod template;
pub mod value;
