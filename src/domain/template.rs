//! Materialized templates and built messages.
//!
//! A [`Template`] is the static half of a log message: the rendered template
//! string and its segment list. It is shared by every invocation of a call
//! site. A [`Message`] pairs a shared template with the values supplied by
//! one invocation.

use crate::domain::segment::Segment;
use crate::domain::value::Value;
use smallvec::SmallVec;
use std::fmt::Write as _;
use std::sync::Arc;

/// Inline capacity of the values buffer; messages with more holes spill to the heap.
pub const INLINE_VALUES: usize = 4;

/// Values collected for one message, in hole order.
pub type Values = SmallVec<[Value; INLINE_VALUES]>;

/// Immutable (template string, segment list) pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    text: String,
    segments: Vec<Segment>,
    hole_count: usize,
}

impl Template {
    /// The template of a message with no segments.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(text: String, segments: Vec<Segment>) -> Self {
        let hole_count = segments.iter().filter(|s| s.is_hole()).count();
        Self {
            text,
            segments,
            hole_count,
        }
    }

    /// The rendered template string, e.g. `"Test {x,5:F2}"`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of hole segments.
    pub fn hole_count(&self) -> usize {
        self.hole_count
    }

    /// Iterate over the bare names of the holes, in order.
    pub fn hole_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments
            .iter()
            .filter_map(Segment::as_hole)
            .map(|hole| hole.name.as_ref())
    }
}

/// A cached template paired with the values of one invocation.
///
/// Produced by [`TemplateBuilder::build`](crate::TemplateBuilder::build).
#[derive(Debug, Clone)]
pub struct Message {
    template: Arc<Template>,
    values: Values,
}

impl Message {
    pub(crate) fn new(template: Arc<Template>, values: Values) -> Self {
        debug_assert_eq!(
            template.hole_count(),
            values.len(),
            "hole count must match the number of collected values"
        );
        Self { template, values }
    }

    /// The shared template.
    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    /// The rendered template string.
    pub fn text(&self) -> &str {
        self.template.text()
    }

    pub fn segments(&self) -> &[Segment] {
        self.template.segments()
    }

    /// The runtime values, in hole order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate over `(hole name, value)` pairs, in hole order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.template.hole_names().zip(self.values.iter())
    }

    /// Split into the shared template and the owned values.
    pub fn into_parts(self) -> (Arc<Template>, Values) {
        (self.template, self.values)
    }

    /// Render the plain message: literal text verbatim, each hole replaced by
    /// its value.
    ///
    /// Alignment is honored (positive right-aligns, negative left-aligns).
    /// Format strings are framework specific and are not interpreted here.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.template.text().len());
        let mut values = self.values.iter();
        let null = Value::Null;

        for segment in self.template.segments() {
            match segment {
                Segment::Literal { raw, .. } => out.push_str(raw),
                Segment::Hole(hole) => {
                    let value = values.next().unwrap_or(&null);
                    // Writing into a String cannot fail.
                    let _ = match hole.alignment {
                        Some(width) if width < 0 => {
                            write!(out, "{:<width$}", value, width = width.unsigned_abs() as usize)
                        }
                        Some(width) => write!(out, "{:>width$}", value, width = width as usize),
                        None => write!(out, "{}", value),
                    };
                }
            }
        }

        out
    }
}
