use std::sync::Arc;
use tracing_template_cache::{
    Capture, EdgeKind, FormatKey, NodeKind, Segment, TemplateCache, Value,
};

#[test]
fn test_literal_braces_are_escaped() {
    let cache = TemplateCache::new();
    let mut builder = cache.message();
    builder.append_literal("a{b");
    let message = builder.build();

    assert_eq!(message.text(), "a{{b");
    assert!(message.values().is_empty());
}

#[test]
fn test_formatted_hole_with_alignment_and_format() {
    let cache = TemplateCache::new();
    let mut builder = cache.message();
    builder
        .append_literal("Test ")
        .append_formatted_hole(FormatKey::new("x").with_alignment(5).with_format("F2"), 3.14159);
    let message = builder.build();

    assert_eq!(message.text(), "Test {x,5:F2}");
    let properties: Vec<_> = message.properties().collect();
    assert_eq!(properties, [("x", &Value::from(3.14159))]);
}

#[test]
fn test_hole_between_literals() {
    let cache = TemplateCache::new();
    let mut builder = cache.message();
    builder
        .append_literal("A")
        .append_hole("x", 42)
        .append_literal("B");
    let message = builder.build();

    assert_eq!(message.text(), "A{x}B");
    assert_eq!(message.values(), &[Value::from(42)]);
}

#[test]
fn test_capture_sigils_are_preserved_in_text_and_stripped_in_names() {
    let cache = TemplateCache::new();
    let mut builder = cache.message();
    builder
        .append_literal("User ")
        .append_hole("@user", Value::debug(("alice", 7)))
        .append_literal(" as ")
        .append_hole("$role", "admin");
    let message = builder.build();

    assert_eq!(message.text(), "User {@user} as {$role}");
    let names: Vec<_> = message.properties().map(|(name, _)| name).collect();
    assert_eq!(names, ["user", "role"]);

    let captures: Vec<_> = message
        .segments()
        .iter()
        .filter_map(Segment::as_hole)
        .map(|hole| hole.capture)
        .collect();
    assert_eq!(captures, [Capture::Destructure, Capture::Stringify]);
}

#[test]
fn test_sigil_names_are_distinct_edges() {
    let cache = TemplateCache::new();
    let texts: Vec<_> = ["x", "@x", "$x"]
        .into_iter()
        .map(|name| {
            let mut builder = cache.message();
            builder.append_hole(name, 1);
            builder.build().text().to_string()
        })
        .collect();

    assert_eq!(texts, ["{x}", "{@x}", "{$x}"]);
    assert_eq!(cache.root().edge_count(EdgeKind::Hole), 3);
}

#[test]
fn test_repeated_invocations_share_one_template() {
    let cache = TemplateCache::new();
    let messages: Vec<_> = (0..10)
        .map(|i| {
            let mut builder = cache.message();
            builder
                .append_literal("Request ")
                .append_hole("id", i)
                .append_literal(" done");
            builder.build()
        })
        .collect();

    let first = messages[0].template();
    for (i, message) in messages.iter().enumerate() {
        assert!(Arc::ptr_eq(first, message.template()));
        assert_eq!(message.values(), &[Value::from(i as i32)]);
    }
    assert_eq!(cache.metrics().templates_materialized(), 1);
    assert_eq!(cache.metrics().nodes_created(), 3);
}

#[test]
fn test_shared_prefix_diverges_into_distinct_templates() {
    let cache = TemplateCache::new();

    let mut builder = cache.message();
    builder.append_literal("User ").append_hole("name", "a");
    let by_name = builder.build();

    let mut builder = cache.message();
    builder.append_literal("User ").append_hole("id", 1);
    let by_id = builder.build();

    assert_eq!(by_name.text(), "User {name}");
    assert_eq!(by_id.text(), "User {id}");

    let prefix = cache.root().edge_count(EdgeKind::Literal);
    assert_eq!(prefix, 1);
    assert_eq!(cache.metrics().nodes_created(), 3);
}

#[test]
fn test_adjacent_literals_are_kept_as_separate_segments() {
    let cache = TemplateCache::new();
    let mut builder = cache.message();
    builder.append_literal("ab").append_literal("cd");
    let split = builder.build();

    let mut builder = cache.message();
    builder.append_literal("abcd");
    let joined = builder.build();

    assert_eq!(split.text(), joined.text());
    assert_eq!(split.segments().len(), 2);
    assert_eq!(joined.segments().len(), 1);
    assert!(!Arc::ptr_eq(split.template(), joined.template()));
}

#[test]
fn test_plain_and_formatted_holes_with_same_name_are_distinct() {
    let cache = TemplateCache::new();

    let mut builder = cache.message();
    builder.append_hole("x", 1);
    let plain = builder.build();

    let mut builder = cache.message();
    builder.append_formatted_hole(FormatKey::new("x"), 1);
    let formatted = builder.build();

    // Same text, different edges
    assert_eq!(plain.text(), "{x}");
    assert_eq!(formatted.text(), "{x}");
    assert!(!Arc::ptr_eq(plain.template(), formatted.template()));
    assert_eq!(cache.root().edge_count(EdgeKind::Hole), 1);
    assert_eq!(cache.root().edge_count(EdgeKind::FormattedHole), 1);
}

#[test]
fn test_many_holes_spill_past_inline_capacity() {
    let cache = TemplateCache::new();
    let names = ["a", "b", "c", "d", "e", "f", "g"];

    let mut builder = cache.message();
    for (i, name) in names.iter().enumerate() {
        builder.append_literal(" ").append_hole(*name, i);
    }
    let message = builder.build();

    assert_eq!(message.text(), " {a} {b} {c} {d} {e} {f} {g}");
    assert_eq!(message.values().len(), names.len());
    assert_eq!(message.render(), " 0 1 2 3 4 5 6");
}

#[test]
fn test_node_path_reflects_appends() {
    let cache = TemplateCache::new();
    let mut builder = cache.message();
    builder
        .append_literal("a")
        .append_hole("b", 1)
        .append_formatted_hole(FormatKey::new("c").with_format("x"), 2);
    let node = Arc::clone(builder.node());
    builder.build();

    assert_eq!(node.depth(), 3);
    assert_eq!(
        node.kind(),
        &NodeKind::FormattedHole(FormatKey::new("c").with_format("x"))
    );
    let parent = node.parent().unwrap();
    assert_eq!(parent.kind(), &NodeKind::Hole("b".into()));
    assert!(node.is_materialized());
    assert!(!parent.is_materialized());
}

#[test]
fn test_default_capture_applies_to_unmarked_holes_only() {
    let cache = TemplateCache::builder()
        .with_default_capture(Capture::Destructure)
        .build()
        .unwrap();

    let mut builder = cache.message();
    builder
        .append_hole("plain", 1)
        .append_literal(" ")
        .append_hole("$marked", 2)
        .append_literal(" ")
        .append_formatted_hole(FormatKey::new("fmt").with_alignment(3), 3);
    let message = builder.build();

    assert_eq!(message.text(), "{@plain} {$marked} {@fmt,3}");
    let names: Vec<_> = message.properties().map(|(name, _)| name).collect();
    assert_eq!(names, ["plain", "marked", "fmt"]);
}

#[test]
fn test_reset_isolates_later_messages() {
    let cache = TemplateCache::new();

    let mut builder = cache.message();
    builder.append_literal("before ").append_hole("v", 1);
    let before = builder.build();

    cache.reset();

    let mut builder = cache.message();
    builder.append_literal("before ").append_hole("v", 2);
    let after = builder.build();

    // Old message is untouched, new message got a fresh template
    assert_eq!(before.text(), "before {v}");
    assert_eq!(before.values(), &[Value::from(1)]);
    assert_eq!(after.text(), "before {v}");
    assert!(!Arc::ptr_eq(before.template(), after.template()));
    assert_eq!(cache.metrics().templates_materialized(), 2);
}

#[test]
fn test_builder_abandoned_across_reset_still_builds() {
    let cache = TemplateCache::new();

    let mut builder = cache.message();
    builder.append_literal("stale ");
    cache.reset();
    builder.append_hole("v", 1);
    let message = builder.build();

    assert_eq!(message.text(), "stale {v}");
    // The abandoned subtree is not reachable from the fresh root
    assert_eq!(cache.root().edge_count(EdgeKind::Literal), 0);
}

#[test]
fn test_reset_after_very_long_message() {
    let cache = TemplateCache::new();
    let mut builder = cache.message();
    for i in 0..100_000 {
        builder.append_literal("x").append_hole("i", i);
    }
    let long = builder.build();

    cache.reset();
    assert_eq!(cache.root().edge_count(EdgeKind::Literal), 0);
    assert_eq!(long.values().len(), 100_000);
    assert_eq!(long.text().len(), 100_000 * "x{i}".len());

    // The cache is usable again, and dropping it afterwards is fine too
    let mut builder = cache.message();
    builder.append_literal("x").append_hole("i", 0);
    assert_eq!(builder.build().text(), "x{i}");
    drop(cache);
}

#[test]
fn test_drop_after_very_long_message() {
    let cache = TemplateCache::new();
    let mut builder = cache.message();
    for _ in 0..100_000 {
        builder.append_hole("v", 1);
    }
    let long = builder.build();

    drop(cache);
    assert_eq!(long.template().hole_count(), 100_000);
}
