//! # tracing-template-cache
//!
//! A concurrent template-caching trie for structured log messages.
//!
//! A structured log call site has a fixed *shape*: a sequence of literal text
//! fragments and named holes. This crate canonicalizes that shape in a shared,
//! append-only prefix tree so that every execution of the call site reuses one
//! immutable, precomputed [`Template`] instead of re-deriving the template
//! string each time. Each call still supplies fresh runtime values, which are
//! collected separately and paired with the cached template when the message
//! is built.
//!
//! ## Quick Start
//!
//! ```rust
//! use tracing_template_cache::{FormatKey, TemplateBuilder, Value};
//!
//! // Appends follow source order: "Request {id} took {elapsed,8:F2}ms"
//! let mut builder = TemplateBuilder::acquire();
//! builder
//!     .append_literal("Request ")
//!     .append_hole("id", 17)
//!     .append_literal(" took ")
//!     .append_formatted_hole(FormatKey::new("elapsed").with_alignment(8).with_format("F2"), 3.5)
//!     .append_literal("ms");
//! let message = builder.build();
//!
//! assert_eq!(message.text(), "Request {id} took {elapsed,8:F2}ms");
//! assert_eq!(message.values(), &[Value::from(17), Value::from(3.5)]);
//! assert_eq!(message.render(), "Request 17 took      3.5ms");
//! ```
//!
//! ## How It Works
//!
//! Every append walks one edge of the trie, starting at the root:
//!
//! ```text
//! root
//! ├─ "Request " ─ {id} ─ " took " ─ {elapsed,8:F2} ─ "ms"   ← terminal node, template cached here
//! └─ "User " ─ {@user}
//! ```
//!
//! - **Nodes** are identified by their parent and the edge that created them.
//!   Two builders appending the same sequence reach the same node, even when
//!   they race to create it.
//! - **Edges** live in three independent edge-sets per node (literal text,
//!   plain hole name, formatted hole). Each set starts empty, stores its first
//!   child inline, and is promoted to a sharded concurrent map on its second
//!   distinct key. Promotion is a compare-and-swap; lookups never lock unless
//!   the set has been promoted.
//! - **Templates** are materialized the first time a node is built and kept
//!   in a set-once cell. Concurrent first builds may each render a candidate,
//!   but exactly one is installed and shared.
//! - **Builders** are thread-confined and recycle their state through a
//!   thread-local free-list.
//!
//! ## Template Syntax
//!
//! | Append | Renders as |
//! |--------|------------|
//! | `append_literal("a{b")` | `a{{b` (braces doubled) |
//! | `append_hole("x", v)` | `{x}` |
//! | `append_hole("@x", v)` | `{@x}` (destructure) |
//! | `append_hole("$x", v)` | `{$x}` (stringify) |
//! | `append_formatted_hole(FormatKey::new("x").with_alignment(5), v)` | `{x,5}` |
//! | `append_formatted_hole(FormatKey::new("x").with_format("F2"), v)` | `{x:F2}` |
//! | `append_formatted_hole(FormatKey::new("x").with_alignment(-5).with_format("F2"), v)` | `{x,-5:F2}` |
//!
//! Hole names in [`Message::properties`] have their sigil stripped.
//!
//! ## Independent Caches
//!
//! [`TemplateBuilder::acquire`] uses the process-wide cache. Independent caches
//! can be created for embedding or isolation, optionally configured:
//!
//! ```rust
//! use tracing_template_cache::{Capture, TemplateCache};
//!
//! let cache = TemplateCache::builder()
//!     .with_shard_amount(8)
//!     .with_default_capture(Capture::Stringify)
//!     .build()
//!     .unwrap();
//!
//! let mut builder = cache.message();
//! builder.append_literal("Hello ").append_hole("name", "world");
//! assert_eq!(builder.build().text(), "Hello {$name}");
//! ```
//!
//! ## Resetting
//!
//! [`TemplateCache::reset`] discards every cached node and template. It is
//! meant for test isolation only and must not run while other threads are
//! building messages against the same cache. Messages built before a reset
//! are unaffected.
//!
//! ## Observability
//!
//! The cache counts its cold-path work (node creation, edge promotion,
//! template materialization, lost races, resets) and logs promotions and
//! resets through `tracing` at `DEBUG` level:
//!
//! ```rust
//! use tracing_template_cache::TemplateCache;
//!
//! let cache = TemplateCache::new();
//! for _ in 0..3 {
//!     let mut builder = cache.message();
//!     builder.append_literal("tick");
//!     builder.build();
//! }
//!
//! let snapshot = cache.metrics().snapshot();
//! assert_eq!(snapshot.nodes_created, 1);
//! assert_eq!(snapshot.templates_materialized, 1);
//! ```

// Domain layer - pure data types
pub mod domain;

// Application layer - the template trie
pub mod application;

// Infrastructure layer - storage and test doubles
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    format_key::FormatKey,
    segment::{escape, Capture, HoleSegment, Segment},
    template::{Message, Template, Values, INLINE_VALUES},
    value::Value,
};

pub use application::{
    builder::TemplateBuilder,
    cache::{BuildError, CacheConfig, TemplateCache, TemplateCacheBuilder},
    metrics::{CacheMetrics, CacheMetricsSnapshot},
    node::{EdgeKind, Node, NodeKind},
};
