//! Concurrent example: many threads building the same call sites.
//!
//! Threads race to create the same trie nodes and materialize the same
//! templates. Every thread still ends up with the one shared template, and
//! the metrics show how much work was duplicated and thrown away.

use std::sync::{Arc, Barrier};
use std::thread;
use tracing_subscriber::prelude::*;
use tracing_template_cache::TemplateCache;

const THREADS: usize = 8;
const CALL_SITES: usize = 16;

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Concurrent Template Cache Example ===\n");

    let cache = Arc::new(
        TemplateCache::builder()
            .with_shard_amount(8)
            .build()
            .expect("valid cache configuration"),
    );
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut templates = Vec::with_capacity(CALL_SITES);
                for site in 0..CALL_SITES {
                    let mut builder = cache.message();
                    builder
                        .append_literal(format!("site {} ", site))
                        .append_hole("thread", t)
                        .append_literal(" step ")
                        .append_hole("step", site);
                    templates.push(Arc::clone(builder.build().template()));
                }
                templates
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("worker thread panicked"))
        .collect();

    let consistent = (0..CALL_SITES).all(|site| {
        results
            .iter()
            .all(|templates| Arc::ptr_eq(&templates[site], &results[0][site]))
    });
    println!("Every thread got the same template per call site: {}", consistent);

    let snapshot = cache.metrics().snapshot();
    println!("\nNodes created:          {}", snapshot.nodes_created);
    println!("Candidates discarded:   {}", snapshot.candidates_discarded);
    println!("Edge promotions:        {}", snapshot.edge_promotions);
    println!("Templates materialized: {}", snapshot.templates_materialized);
    println!("Templates discarded:    {}", snapshot.templates_discarded);
    println!("Wasted node rate:       {:.2}%", snapshot.wasted_node_rate() * 100.0);

    println!("\n=== Example Complete ===");
}
