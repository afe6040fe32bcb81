use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use stream_sieve::algs::order::propagate_order;
use stream_sieve::algs::resolve::resolve_topology;
use stream_sieve::prelude::*;

/// Full binary drainage tree: arc `k` drains into arc `k / 2`, root is arc 1.
fn build_binary_tree(levels: u32, rng: &mut SmallRng) -> StreamNetwork {
    let count = (1i64 << levels) - 1;
    let records = (1..=count).map(|k| {
        let to = if k == 1 { 0 } else { k / 2 };
        ArcRecord::new(k, k, to, rng.gen_range(50.0..2_000.0))
            .with_elev_drop(rng.gen_range(0.0..20.0))
            .with_local_area(rng.gen_range(0.0..5_000.0))
            .with_max_upstream_accumulation(rng.gen_range(0.0..1.0e5))
    });
    StreamNetwork::from_records(records.collect::<Vec<_>>()).expect("valid tree")
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let mut rng = SmallRng::seed_from_u64(42);
    let cfg = EngineConfig::default();

    for &levels in &[10u32, 14u32] {
        let network = build_binary_tree(levels, &mut rng);

        group.bench_with_input(BenchmarkId::new("derive", levels), &levels, |b, _| {
            b.iter(|| {
                let out = derive_network(&network, &cfg).expect("derive");
                black_box(out);
            });
        });

        group.bench_with_input(BenchmarkId::new("order_only", levels), &levels, |b, _| {
            let mut diags = Diagnostics::new();
            let links =
                resolve_topology(&network, DownstreamPolicy::FirstWins, &mut diags).expect("links");
            b.iter(|| {
                let out = propagate_order(&links, network.len() + 1).expect("order");
                black_box(out);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
