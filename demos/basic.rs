//! Basic example: building messages against the process-wide cache.
//!
//! Shows how repeated invocations of one call site share a single cached
//! template while each invocation carries its own values.

use std::sync::Arc;
use tracing_template_cache::{FormatKey, TemplateBuilder, TemplateCache};

fn log_request(id: u64, elapsed_ms: f64) -> tracing_template_cache::Message {
    let mut builder = TemplateBuilder::acquire();
    builder
        .append_literal("Request ")
        .append_hole("id", id)
        .append_literal(" took ")
        .append_formatted_hole(
            FormatKey::new("elapsed").with_alignment(8).with_format("F2"),
            elapsed_ms,
        )
        .append_literal("ms");
    builder.build()
}

fn main() {
    println!("=== Basic Template Cache Example ===\n");

    let messages: Vec<_> = (1..=5).map(|i| log_request(i, i as f64 * 1.25)).collect();

    for message in &messages {
        println!("template: {:<40} rendered: {}", message.text(), message.render());
    }

    let shared = messages
        .iter()
        .all(|m| Arc::ptr_eq(m.template(), messages[0].template()));
    println!("\nAll invocations share one template: {}", shared);

    // Braces in literal text are escaped in the template, kept raw in segments
    let mut builder = TemplateBuilder::acquire();
    builder
        .append_literal("Config {")
        .append_hole("@config", "debug")
        .append_literal("}");
    let message = builder.build();
    println!("\nEscaped template: {}", message.text());
    for (name, value) in message.properties() {
        println!("  property {} = {}", name, value);
    }

    let snapshot = TemplateCache::global().metrics().snapshot();
    println!("\nCache metrics: {:?}", snapshot);

    println!("\n=== Example Complete ===");
}
