use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use covenant_types::Timepoint;
use covenant_votes::Trace;

fn make_trace(n: u64) -> Trace {
    let mut trace = Trace::new();
    for i in 0..n {
        trace.push(Timepoint::new(i * 10), i as u128).unwrap();
    }
    trace
}

fn bench_upper_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_upper_lookup");

    for len in [10u64, 100, 1_000, 10_000] {
        let trace = make_trace(len);
        let recent = Timepoint::new((len - 1) * 10);
        let old = Timepoint::new(15);

        group.bench_with_input(BenchmarkId::new("recent_key", len), &len, |b, _| {
            b.iter(|| black_box(trace.upper_lookup(black_box(recent))));
        });
        group.bench_with_input(BenchmarkId::new("recent_key_tuned", len), &len, |b, _| {
            b.iter(|| black_box(trace.upper_lookup_recent(black_box(recent))));
        });
        group.bench_with_input(BenchmarkId::new("old_key_tuned", len), &len, |b, _| {
            b.iter(|| black_box(trace.upper_lookup_recent(black_box(old))));
        });
    }

    group.finish();
}

fn bench_push(c: &mut Criterion) {
    c.bench_function("trace_push_1000", |b| {
        b.iter(|| black_box(make_trace(1_000)));
    });
}

criterion_group!(benches, bench_upper_lookup, bench_push);
criterion_main!(benches);
