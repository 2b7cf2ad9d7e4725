//! Trie vertices.
//!
//! A node is identified by the (parent, edge key) pair that created it. Every
//! node owns three independent edge-sets: literal text, plain hole names and
//! formatted-hole keys. Children are created the first time an edge is walked
//! and are never removed, except when the root is reset.

use crate::application::cache::CacheContext;
use crate::domain::format_key::FormatKey;
use crate::domain::template::Template;
use crate::infrastructure::edges::{EdgeSet, Inserted};
use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

/// The edge that led to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The root; no incoming edge.
    Root,
    /// Literal text, unescaped.
    Literal(Cow<'static, str>),
    /// A plain hole, possibly carrying a capture sigil.
    Hole(Cow<'static, str>),
    /// A hole with alignment and/or format.
    FormattedHole(FormatKey),
}

/// Which of a node's edge-sets to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Literal,
    Hole,
    FormattedHole,
}

/// A vertex of the template trie.
pub struct Node {
    parent: Option<Arc<Node>>,
    depth: usize,
    kind: NodeKind,
    literals: EdgeSet<Cow<'static, str>, Arc<Node>>,
    holes: EdgeSet<Cow<'static, str>, Arc<Node>>,
    formatted: EdgeSet<FormatKey, Arc<Node>>,
    pub(crate) template: OnceLock<Arc<Template>>,
}

impl Node {
    /// Create a root node. Its template is the empty template.
    pub(crate) fn root() -> Arc<Node> {
        let template = OnceLock::new();
        let _ = template.set(Arc::new(Template::empty()));
        Arc::new(Node {
            parent: None,
            depth: 0,
            kind: NodeKind::Root,
            literals: EdgeSet::new(),
            holes: EdgeSet::new(),
            formatted: EdgeSet::new(),
            template,
        })
    }

    fn child(parent: &Arc<Node>, kind: NodeKind) -> Arc<Node> {
        Arc::new(Node {
            parent: Some(Arc::clone(parent)),
            depth: parent.depth + 1,
            kind,
            literals: EdgeSet::new(),
            holes: EdgeSet::new(),
            formatted: EdgeSet::new(),
            template: OnceLock::new(),
        })
    }

    /// The parent node; `None` for the root.
    pub fn parent(&self) -> Option<&Arc<Node>> {
        self.parent.as_ref()
    }

    /// Distance from the root (0 at the root).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this node's template has been materialized.
    pub fn is_materialized(&self) -> bool {
        self.template.get().is_some()
    }

    /// Number of children reachable through one edge-set.
    pub fn edge_count(&self, kind: EdgeKind) -> usize {
        match kind {
            EdgeKind::Literal => self.literals.len(),
            EdgeKind::Hole => self.holes.len(),
            EdgeKind::FormattedHole => self.formatted.len(),
        }
    }

    /// Whether one edge-set has been promoted to a concurrent map.
    pub fn is_edge_set_promoted(&self, kind: EdgeKind) -> bool {
        match kind {
            EdgeKind::Literal => self.literals.is_promoted(),
            EdgeKind::Hole => self.holes.is_promoted(),
            EdgeKind::FormattedHole => self.formatted.is_promoted(),
        }
    }

    /// Get or create the child reached through literal `text`.
    pub(crate) fn literal_edge(
        self: &Arc<Self>,
        text: Cow<'static, str>,
        cx: &CacheContext,
    ) -> Arc<Node> {
        self.get_or_add_edge(&self.literals, text, EdgeKind::Literal, cx, |text| {
            NodeKind::Literal(text.clone())
        })
    }

    /// Get or create the child reached through plain hole `name`.
    pub(crate) fn hole_edge(
        self: &Arc<Self>,
        name: Cow<'static, str>,
        cx: &CacheContext,
    ) -> Arc<Node> {
        self.get_or_add_edge(&self.holes, name, EdgeKind::Hole, cx, |name| {
            NodeKind::Hole(name.clone())
        })
    }

    /// Get or create the child reached through formatted hole `key`.
    pub(crate) fn formatted_edge(
        self: &Arc<Self>,
        key: FormatKey,
        cx: &CacheContext,
    ) -> Arc<Node> {
        self.get_or_add_edge(&self.formatted, key, EdgeKind::FormattedHole, cx, |key| {
            NodeKind::FormattedHole(key.clone())
        })
    }

    fn get_or_add_edge<K>(
        self: &Arc<Self>,
        edges: &EdgeSet<K, Arc<Node>>,
        key: K,
        edge: EdgeKind,
        cx: &CacheContext,
        kind: impl Fn(&K) -> NodeKind,
    ) -> Arc<Node>
    where
        K: Eq + Hash + Clone,
    {
        if let Some(child) = edges.get(&key) {
            return child;
        }

        let Inserted {
            value,
            created,
            discarded,
            promoted,
        } = edges.get_or_insert_with(key, cx.config.shard_amount, |key| {
            Node::child(self, kind(key))
        });

        if created {
            cx.metrics.record_node_created();
        }
        if discarded > 0 {
            cx.metrics.record_candidates_discarded(discarded);
            tracing::trace!(
                depth = self.depth + 1,
                discarded,
                "discarded candidate trie nodes after losing install race"
            );
        }
        if promoted {
            cx.metrics.record_promotion();
            tracing::debug!(
                depth = self.depth,
                edge = ?edge,
                "promoted template trie edge-set to concurrent map"
            );
        }

        value
    }

    /// Replace all three edge-sets with fresh empty ones and unlink every
    /// node of the abandoned subtree from its children.
    ///
    /// Parents hold their children and children hold their parents, so the
    /// abandoned subtree is only freed once these downward links are cut.
    /// Nodes still held elsewhere keep their parent chain and stay usable.
    /// Returns the number of nodes detached.
    pub(crate) fn detach_subtree(&self) -> usize {
        // Every child is pushed after its parent.
        let mut detached = self.take_children();
        let mut next = 0;
        while next < detached.len() {
            let children = detached[next].take_children();
            detached.extend(children);
            next += 1;
        }

        let count = detached.len();
        // Release deepest first: each drop only decrements a parent that is
        // still held here, so freeing a long chain never recurses.
        while let Some(node) = detached.pop() {
            drop(node);
        }
        count
    }

    fn take_children(&self) -> Vec<Arc<Node>> {
        let mut children = self.literals.take();
        children.extend(self.holes.take());
        children.extend(self.formatted.take());
        children
    }
}

// Not derived: following `parent` would recurse once per level.
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("depth", &self.depth)
            .field("kind", &self.kind)
            .field("literals", &self.literals)
            .field("holes", &self.holes)
            .field("formatted", &self.formatted)
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::CacheContext;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_root() {
        let root = Node::root();
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.kind(), &NodeKind::Root);
        assert!(root.is_materialized());
    }

    #[test]
    fn test_child_links_to_parent() {
        let cx = CacheContext::default();
        let root = Node::root();
        let a = root.literal_edge("a".into(), &cx);
        let x = a.hole_edge("x".into(), &cx);

        assert_eq!(a.depth(), 1);
        assert_eq!(x.depth(), 2);
        assert!(Arc::ptr_eq(x.parent().unwrap(), &a));
        assert!(Arc::ptr_eq(a.parent().unwrap(), &root));
        assert_eq!(x.kind(), &NodeKind::Hole("x".into()));
        assert!(!x.is_materialized());
    }

    #[test]
    fn test_same_key_same_node() {
        let cx = CacheContext::default();
        let root = Node::root();
        let first = root.literal_edge("hello".into(), &cx);
        let second = root.literal_edge(Cow::Owned("hello".to_string()), &cx);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cx.metrics.nodes_created(), 1);
    }

    #[test]
    fn test_edge_sets_are_independent() {
        let cx = CacheContext::default();
        let root = Node::root();
        let literal = root.literal_edge("x".into(), &cx);
        let hole = root.hole_edge("x".into(), &cx);
        let formatted = root.formatted_edge(FormatKey::new("x"), &cx);

        assert!(!Arc::ptr_eq(&literal, &hole));
        assert!(!Arc::ptr_eq(&hole, &formatted));
        assert_eq!(root.edge_count(EdgeKind::Literal), 1);
        assert_eq!(root.edge_count(EdgeKind::Hole), 1);
        assert_eq!(root.edge_count(EdgeKind::FormattedHole), 1);
    }

    #[test]
    fn test_formatted_siblings() {
        let cx = CacheContext::default();
        let root = Node::root();
        let key = FormatKey::new("x").with_alignment(5).with_format("F2");
        let base = root.formatted_edge(key.clone(), &cx);
        let same = root.formatted_edge(key, &cx);
        let other_alignment =
            root.formatted_edge(FormatKey::new("x").with_alignment(6).with_format("F2"), &cx);
        let other_format =
            root.formatted_edge(FormatKey::new("x").with_alignment(5).with_format("F3"), &cx);

        assert!(Arc::ptr_eq(&base, &same));
        assert!(!Arc::ptr_eq(&base, &other_alignment));
        assert!(!Arc::ptr_eq(&base, &other_format));
        assert_eq!(root.edge_count(EdgeKind::FormattedHole), 3);
        assert!(root.is_edge_set_promoted(EdgeKind::FormattedHole));
        assert_eq!(cx.metrics.edge_promotions(), 1);
    }

    #[test]
    fn test_concurrent_get_or_add_edge() {
        const THREADS: usize = 32;
        let cx = Arc::new(CacheContext::default());
        let root = Node::root();
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let cx = Arc::clone(&cx);
                let root = Arc::clone(&root);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    root.hole_edge("racy".into(), &cx)
                })
            })
            .collect();

        let nodes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(nodes.iter().all(|n| Arc::ptr_eq(n, &nodes[0])));
        assert_eq!(cx.metrics.nodes_created(), 1);
    }

    #[test]
    fn test_detach_subtree_orphans_children() {
        let cx = CacheContext::default();
        let root = Node::root();
        let old = root.literal_edge("a".into(), &cx);
        let deep = old.hole_edge("x".into(), &cx);
        root.formatted_edge(FormatKey::new("y"), &cx);

        assert_eq!(root.detach_subtree(), 3);
        assert_eq!(root.edge_count(EdgeKind::Literal), 0);
        assert_eq!(root.edge_count(EdgeKind::FormattedHole), 0);
        assert_eq!(old.edge_count(EdgeKind::Hole), 0);

        let new = root.literal_edge("a".into(), &cx);
        assert!(!Arc::ptr_eq(&old, &new));
        // The orphaned chain is still intact upwards
        assert!(Arc::ptr_eq(deep.parent().unwrap(), &old));
        assert!(Arc::ptr_eq(old.parent().unwrap(), &root));
    }

    #[test]
    fn test_detached_subtree_is_freed() {
        let cx = CacheContext::default();
        let root = Node::root();
        let weak = {
            let a = root.literal_edge("a".into(), &cx);
            let x = a.hole_edge("x".into(), &cx);
            Arc::downgrade(&x)
        };
        assert!(weak.upgrade().is_some());

        root.detach_subtree();
        assert!(weak.upgrade().is_none());
    }

    const DEEP: usize = 100_000;

    #[test]
    fn test_detach_deep_chain() {
        let cx = CacheContext::default();
        let root = Node::root();
        let (first, last) = {
            let mut current = Arc::clone(&root);
            let mut first = None;
            for _ in 0..DEEP {
                current = current.literal_edge("x".into(), &cx);
                first.get_or_insert_with(|| Arc::downgrade(&current));
            }
            (first.unwrap(), Arc::downgrade(&current))
        };
        assert_eq!(last.upgrade().unwrap().depth(), DEEP);

        assert_eq!(root.detach_subtree(), DEEP);
        assert!(first.upgrade().is_none());
        assert!(last.upgrade().is_none());
    }

    #[test]
    fn test_debug_does_not_follow_parents() {
        let cx = CacheContext::default();
        let root = Node::root();
        let mut current = Arc::clone(&root);
        for _ in 0..DEEP {
            current = current.hole_edge("x".into(), &cx);
        }

        let rendered = format!("{:?}", current);
        assert!(rendered.contains("depth: 100000"));
        drop(current);
        root.detach_subtree();
    }
}
