//! Per-invocation template builder.
//!
//! A builder walks one trie edge per append, starting at the root, and
//! collects the runtime values in hole order. `build` resolves the terminal
//! node's template (materializing it on first use) and pairs it with the
//! values. Builders are thread-confined and recycle their state through a
//! thread-local free-list.

use crate::application::cache::TemplateCache;
use crate::application::materializer;
use crate::application::node::Node;
use crate::application::pool;
use crate::domain::format_key::FormatKey;
use crate::domain::segment::Capture;
use crate::domain::template::{Message, Values};
use crate::domain::value::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Builds one message against a [`TemplateCache`].
///
/// Appends must follow source order. `build` consumes the builder, so it can
/// neither be built twice nor appended to afterwards.
///
/// # Example
/// ```
/// use tracing_template_cache::{TemplateBuilder, Value};
///
/// let mut builder = TemplateBuilder::acquire();
/// builder
///     .append_literal("A")
///     .append_hole("x", 42)
///     .append_literal("B");
/// let message = builder.build();
///
/// assert_eq!(message.text(), "A{x}B");
/// assert_eq!(message.values(), &[Value::from(42)]);
/// ```
#[derive(Debug)]
pub struct TemplateBuilder<'c> {
    cache: &'c TemplateCache,
    current: Arc<Node>,
    values: Values,
}

impl TemplateBuilder<'static> {
    /// Start a message against the process-wide cache.
    pub fn acquire() -> Self {
        TemplateBuilder::acquire_in(TemplateCache::global())
    }
}

impl<'c> TemplateBuilder<'c> {
    pub(crate) fn acquire_in(cache: &'c TemplateCache) -> Self {
        Self {
            cache,
            current: Arc::clone(cache.root()),
            values: pool::acquire(),
        }
    }

    /// Walk the edge for literal `text`.
    pub fn append_literal(&mut self, text: impl Into<Cow<'static, str>>) -> &mut Self {
        self.current = self.current.literal_edge(text.into(), self.cache.context());
        self
    }

    /// Walk the edge for hole `name` and record its value.
    ///
    /// `name` may carry a capture sigil (`@name`, `$name`).
    pub fn append_hole(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.current = self.current.hole_edge(name.into(), self.cache.context());
        self.values.push(value.into());
        self
    }

    /// Like [`append_hole`](Self::append_hole), prefixing `capture`'s sigil
    /// unless the name already carries one.
    pub fn append_captured_hole(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        capture: Capture,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.append_hole(capture.apply(name), value)
    }

    /// Walk the edge for a formatted hole and record its value.
    pub fn append_formatted_hole(&mut self, key: FormatKey, value: impl Into<Value>) -> &mut Self {
        self.current = self.current.formatted_edge(key, self.cache.context());
        self.values.push(value.into());
        self
    }

    /// The node reached by the appends so far.
    pub fn node(&self) -> &Arc<Node> {
        &self.current
    }

    /// Number of holes appended so far.
    pub fn hole_count(&self) -> usize {
        self.values.len()
    }

    /// Resolve the template and pair it with the collected values.
    ///
    /// The values are moved into an exactly sized buffer; the builder's own
    /// buffer goes back to the free-list with its capacity.
    pub fn build(mut self) -> Message {
        let template = materializer::get_template(&self.current, self.cache.context());
        let values: Values = self.values.drain(..).collect();
        Message::new(template, values)
    }
}

impl Drop for TemplateBuilder<'_> {
    fn drop(&mut self) {
        pool::release(std::mem::take(&mut self.values));
    }
}
