use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docdex_core::normalize::normalize_term;

fn bench_normalize(c: &mut Criterion) {
    let words = [
        "Ensemble", "operators", "Scaling", "MiniCluster", "sidecars", "gRPC", "algorithms",
        "the", "membership", "clusters",
    ];
    c.bench_function("normalize_terms", |b| {
        b.iter(|| {
            for w in words {
                black_box(normalize_term(black_box(w)));
            }
        })
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
