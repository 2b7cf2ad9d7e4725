//! Template materialization.
//!
//! The first request for a node's template walks the ancestor chain once,
//! renders the template string and segment list, and installs the result in
//! the node's set-once cell. Concurrent first requests may each render a
//! candidate; exactly one is installed and every caller receives that one.

use crate::application::cache::CacheContext;
use crate::application::node::{Node, NodeKind};
use crate::domain::segment::{Capture, HoleSegment, Segment};
use crate::domain::template::Template;
use std::borrow::Cow;
use std::sync::Arc;

/// Return the template for `node`, materializing it on first demand.
pub(crate) fn get_template(node: &Node, cx: &CacheContext) -> Arc<Template> {
    if let Some(template) = node.template.get() {
        return Arc::clone(template);
    }

    let candidate = Arc::new(render(node, cx.config.default_capture));
    let mut installed = false;
    let template = node.template.get_or_init(|| {
        installed = true;
        candidate
    });

    if installed {
        cx.metrics.record_materialized();
        tracing::trace!(
            depth = node.depth(),
            template = template.text(),
            "materialized message template"
        );
    } else {
        cx.metrics.record_template_discarded();
    }

    Arc::clone(template)
}

/// Build the template for the chain from the root to `node`.
fn render(node: &Node, default_capture: Capture) -> Template {
    let mut chain: Vec<&Node> = Vec::with_capacity(node.depth());
    let mut cursor = node;
    while let Some(parent) = cursor.parent() {
        chain.push(cursor);
        cursor = parent;
    }

    let mut text = String::new();
    let mut segments = Vec::with_capacity(chain.len());

    for step in chain.into_iter().rev() {
        match step.kind() {
            NodeKind::Root => {}
            NodeKind::Literal(raw) => {
                let segment = Segment::literal(raw.clone());
                if let Segment::Literal { escaped, .. } = &segment {
                    text.push_str(escaped);
                }
                segments.push(segment);
            }
            NodeKind::Hole(name) => {
                let hole = hole_segment(name, None, None, default_capture);
                hole.write_syntax(&mut text);
                segments.push(Segment::Hole(hole));
            }
            NodeKind::FormattedHole(key) => {
                let hole = hole_segment(
                    key.name_cow(),
                    key.alignment(),
                    key.format_cow().cloned(),
                    default_capture,
                );
                hole.write_syntax(&mut text);
                segments.push(Segment::Hole(hole));
            }
        }
    }

    Template::new(text, segments)
}

fn hole_segment(
    name: &Cow<'static, str>,
    alignment: Option<i32>,
    format: Option<Cow<'static, str>>,
    default_capture: Capture,
) -> HoleSegment {
    let (capture, bare) = Capture::split(name);
    let capture = match capture {
        Capture::Default => default_capture,
        explicit => explicit,
    };
    HoleSegment {
        name: bare,
        alignment,
        format,
        capture,
    }
}
