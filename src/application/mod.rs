//! Application layer - the concurrent template trie.
//!
//! This layer builds on the domain types and the edge storage:
//! - Trie nodes and edge walking
//! - Template materialization
//! - The root cache, its configuration and reset
//! - Per-invocation builders and their thread-local free-list
//! - Cache metrics

pub mod builder;
pub mod cache;
pub(crate) mod materializer;
pub mod metrics;
pub mod node;
pub(crate) mod pool;
