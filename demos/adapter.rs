//! Adapter example: handing built messages to a logging framework.
//!
//! The cache only produces (template, values) pairs. This example shows a
//! minimal adapter that emits them as `tracing` events, keeping the template
//! string as a stable field that downstream tools can group by.

use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_template_cache::{Capture, FormatKey, Message, TemplateCache};

/// Emit a built message as a structured `tracing` event.
fn emit(message: &Message) {
    let properties: Vec<String> = message
        .properties()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();

    info!(
        template = message.text(),
        properties = %properties.join(" "),
        "{}",
        message.render()
    );
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Adapter Example ===\n");

    // An embedded cache that stringifies unmarked holes
    let cache = TemplateCache::builder()
        .with_default_capture(Capture::Stringify)
        .build()
        .expect("valid cache configuration");

    for (user, items) in [("alice", 3), ("bob", 12), ("carol", 7)] {
        let mut builder = cache.message();
        builder
            .append_literal("User ")
            .append_hole("user", user)
            .append_literal(" checked out ")
            .append_formatted_hole(FormatKey::new("items").with_alignment(3), items)
            .append_literal(" items");
        emit(&builder.build());
    }

    println!(
        "\nTemplates materialized: {}",
        cache.metrics().templates_materialized()
    );
    println!("\n=== Example Complete ===");
}
