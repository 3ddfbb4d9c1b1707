use criterion::{criterion_group, criterion_main, Criterion};
use fts_core::boolean::{merge, MergeOp};
use fts_core::tokenizer::tokenize;

fn bench_tokenize(c: &mut Criterion) {
    let text = "The quick brown fox jumps over the lazy dog; indexing systems \
                tokenize, normalize and stem every running word. "
        .repeat(200);
    c.bench_function("tokenize_stemmed", |b| b.iter(|| tokenize(&text, true)));
}

fn bench_merge(c: &mut Criterion) {
    let a: Vec<u32> = (0..10_000).map(|i| i * 2).collect();
    let b: Vec<u32> = (0..10_000).map(|i| i * 3).collect();
    c.bench_function("merge_and_10k", |bench| {
        bench.iter(|| merge(&a, &b, MergeOp::And))
    });
    c.bench_function("merge_or_10k", |bench| {
        bench.iter(|| merge(&a, &b, MergeOp::Or))
    });
}

criterion_group!(benches, bench_tokenize, bench_merge);
criterion_main!(benches);
