//! Criterion benchmarks for hot paths in the purled daemon.
//!
//! Run with:
//!   cargo bench
//!
//! Covers:
//!   - schema parsing (serde_json → ConfigSchema)
//!   - context resolution over a realistic document
//!   - full completion calls across the dispatch tiers

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use purled::completion::context::resolve_context;
use purled::completion::engine::complete;
use purled::completion::schema::{self, ConfigSchema, PURL_SCHEMA_JSON};

static DOCUMENT: &str = "idspace: GO\n\
base_url: /obo/go\n\
term_browser: ontobee\n\
products:\n\
- exact: /obo/go.owl\n\
  replacement: http://release.example.org/go.owl\n\
entries:\n\
- exact: /about\n\
  replacement: http://geneontology.org/page/about\n\
  status: permanent\n\
  tests:\n\
  - from: /about\n\
    to: http://geneontology.org/page/about\n\
- prefix: /GO_\n\
  replacement: http://purl.example.org/GO_\n\
tests:\n\
- from: /obo/go.owl\n\
  to: http://release.example.org/go.owl\n";

// ─── Schema parsing ──────────────────────────────────────────────────────────

fn bench_schema_parse(c: &mut Criterion) {
    c.bench_function("schema_parse_purl", |b| {
        b.iter(|| {
            let s: ConfigSchema = serde_json::from_str(black_box(PURL_SCHEMA_JSON)).unwrap();
            black_box(s);
        });
    });
}

// ─── Context resolution ──────────────────────────────────────────────────────

fn bench_resolve_context(c: &mut Criterion) {
    let lines: Vec<&str> = DOCUMENT.split('\n').collect();
    c.bench_function("resolve_context_deep", |b| {
        b.iter(|| {
            let ctx = resolve_context(black_box(&lines), black_box(12));
            black_box(ctx);
        });
    });
}

// ─── Completion ──────────────────────────────────────────────────────────────

fn bench_complete(c: &mut Criterion) {
    let schema = schema::purl_default();
    let lines: Vec<&str> = DOCUMENT.split('\n').collect();

    c.bench_function("complete_top_level", |b| {
        b.iter(|| {
            let out = complete(black_box(&lines), 0, 2, schema);
            black_box(out);
        });
    });

    c.bench_function("complete_nested_item_keys", |b| {
        b.iter(|| {
            // "- prefix" word inside the entries block
            let out = complete(black_box(&lines), 13, 4, schema);
            black_box(out);
        });
    });

    c.bench_function("complete_enum_value", |b| {
        b.iter(|| {
            // value position of "status: permanent"
            let out = complete(black_box(&lines), 9, 12, schema);
            black_box(out);
        });
    });
}

criterion_group!(
    benches,
    bench_schema_parse,
    bench_resolve_context,
    bench_complete
);
criterion_main!(benches);
