//! The root cache.
//!
//! A [`TemplateCache`] owns the root node of a template trie together with the
//! configuration and metrics shared by every node below it. The process-wide
//! instance is available through [`TemplateCache::global`]; independent caches
//! can be built for embedding or test isolation.

use crate::application::builder::TemplateBuilder;
use crate::application::metrics::CacheMetrics;
use crate::application::node::Node;
use crate::domain::segment::Capture;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Error returned when building a [`TemplateCache`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Shard amount must be a power of two greater than one
    InvalidShardAmount(usize),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidShardAmount(n) => {
                write!(
                    f,
                    "shard_amount must be a power of two greater than 1, got {}",
                    n
                )
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Settings shared by every node of one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheConfig {
    /// Shard count for promoted edge maps; `None` uses the map's default
    pub shard_amount: Option<usize>,
    /// Capture rendered for holes whose name carries no sigil
    pub default_capture: Capture,
}

/// Configuration and metrics handed down to nodes on every walk.
#[derive(Debug, Default)]
pub(crate) struct CacheContext {
    pub config: CacheConfig,
    pub metrics: CacheMetrics,
}

impl CacheContext {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            metrics: CacheMetrics::new(),
        }
    }
}

/// Builder for constructing a [`TemplateCache`].
#[derive(Debug, Clone, Default)]
pub struct TemplateCacheBuilder {
    config: CacheConfig,
}

impl TemplateCacheBuilder {
    /// Set the shard count used when an edge-set is promoted to a map.
    ///
    /// Must be a power of two greater than one.
    pub fn with_shard_amount(mut self, shard_amount: usize) -> Self {
        self.config.shard_amount = Some(shard_amount);
        self
    }

    /// Set the capture rendered for holes whose name carries no sigil.
    pub fn with_default_capture(mut self, capture: Capture) -> Self {
        self.config.default_capture = capture;
        self
    }

    /// Build the cache.
    ///
    /// # Errors
    /// Returns `BuildError::InvalidShardAmount` if the shard amount is not a
    /// power of two greater than one.
    pub fn build(self) -> Result<TemplateCache, BuildError> {
        if let Some(shards) = self.config.shard_amount {
            if shards <= 1 || !shards.is_power_of_two() {
                return Err(BuildError::InvalidShardAmount(shards));
            }
        }

        Ok(TemplateCache::with_config(self.config))
    }
}

/// A template trie: root node, configuration and metrics.
///
/// # Example
/// ```
/// use tracing_template_cache::{FormatKey, TemplateCache};
///
/// let cache = TemplateCache::new();
///
/// let mut builder = cache.message();
/// builder.append_literal("Test ");
/// builder.append_formatted_hole(FormatKey::new("x").with_alignment(5).with_format("F2"), 3.14159);
/// let message = builder.build();
///
/// assert_eq!(message.text(), "Test {x,5:F2}");
/// assert_eq!(message.properties().next().unwrap().0, "x");
/// ```
#[derive(Debug)]
pub struct TemplateCache {
    root: Arc<Node>,
    context: CacheContext,
}

static GLOBAL: OnceLock<TemplateCache> = OnceLock::new();

impl TemplateCache {
    /// Create an independent cache with default settings.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a builder for a customized cache.
    pub fn builder() -> TemplateCacheBuilder {
        TemplateCacheBuilder::default()
    }

    fn with_config(config: CacheConfig) -> Self {
        Self {
            root: Node::root(),
            context: CacheContext::new(config),
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static TemplateCache {
        GLOBAL.get_or_init(TemplateCache::new)
    }

    /// Start a message against this cache.
    pub fn message(&self) -> TemplateBuilder<'_> {
        TemplateBuilder::acquire_in(self)
    }

    /// The root node.
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn config(&self) -> &CacheConfig {
        &self.context.config
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.context.metrics
    }

    pub(crate) fn context(&self) -> &CacheContext {
        &self.context
    }

    /// Drop every cached node and template by giving the root fresh, empty
    /// edge-sets.
    ///
    /// Intended for test setup and teardown only. It is not safe to call while
    /// other threads are building messages against this cache: a builder that
    /// already walked past the root keeps extending the abandoned subtree, and
    /// what it produces is never cached again. Messages built before the reset
    /// are unaffected. The root's own (empty) template is kept.
    pub fn reset(&self) {
        let detached = self.root.detach_subtree();
        self.context.metrics.record_reset();
        tracing::debug!(detached, "template cache reset");
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TemplateCache {
    fn drop(&mut self) {
        // Parent and child links form cycles; cut them so the trie is freed.
        self.root.detach_subtree();
    }
}
