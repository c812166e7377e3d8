//! Graph builder hook benchmarks
//!
//! Measures the cost of the hook pairs a host pays on every subscribe and
//! every delivered value.
//!
//! Run with: cargo bench --bench hooks

use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use streamspy_core::config::GraphConfig;
use streamspy_core::graph::{GraphBuilder, ManualScheduler};
use streamspy_core::subscription::{Plugin, SubscriptionRef};

fn graph() -> GraphBuilder {
    let config = GraphConfig::new().with_kept_duration(Duration::ZERO);
    GraphBuilder::new(config, Arc::new(ManualScheduler::new()))
}

fn bench_subscribe_chain(c: &mut Criterion) {
    c.bench_function("subscribe_chain_depth_8", |b| {
        let graph = graph();
        b.iter(|| {
            let chain: Vec<_> = (0..8).map(|_| SubscriptionRef::new()).collect();
            for subscription in &chain {
                graph.before_subscribe(*subscription).unwrap();
            }
            for subscription in chain.iter().rev() {
                graph.after_subscribe(*subscription).unwrap();
            }
            black_box(&chain);
        });
    });
}

fn bench_next(c: &mut Criterion) {
    let graph = graph();
    let root = SubscriptionRef::new();
    graph.before_subscribe(root).unwrap();
    graph.after_subscribe(root).unwrap();

    c.bench_function("next_pair", |b| {
        b.iter(|| {
            graph.before_next(root, black_box(&1_u64)).unwrap();
            graph.after_next(root, black_box(&1_u64)).unwrap();
        });
    });
}

fn bench_merge_and_flush(c: &mut Criterion) {
    let graph = graph();
    let root = SubscriptionRef::new();
    graph.before_subscribe(root).unwrap();
    graph.after_subscribe(root).unwrap();

    c.bench_function("merge_then_flush", |b| {
        b.iter(|| {
            let inner = SubscriptionRef::new();
            graph.before_next(root, &()).unwrap();
            graph.before_subscribe(inner).unwrap();
            graph.after_subscribe(inner).unwrap();
            graph.after_next(root, &()).unwrap();
            graph.after_unsubscribe(inner).unwrap();
        });
    });
}

criterion_group!(benches, bench_subscribe_chain, bench_next, bench_merge_and_flush);
criterion_main!(benches);
