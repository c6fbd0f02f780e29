//! Re-scoring a large candidate set per keystroke.
//!
//! Run with: `cargo bench --package core-filter --bench rescore_bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use core_events::NeverPending;
use core_filter::{Candidate, CandidateSet, FilterScheduler};
use core_text::{MatchMode, Query};
use std::hint::black_box;

/// Path-like lines with some shared structure so windows vary in length.
fn corpus(n: usize) -> CandidateSet {
    let dirs = ["src", "crates/core", "tests/fixtures", "docs/guide", "benches"];
    let names = ["matcher", "ranking", "scheduler", "candidate", "render", "input"];
    CandidateSet::new(
        (0..n)
            .map(|i| {
                let d = dirs[i % dirs.len()];
                let f = names[(i / dirs.len()) % names.len()];
                Candidate::new(&format!("{d}/{f}_{i}.rs"))
            })
            .collect(),
    )
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pass");
    for &n in &[1_000usize, 10_000, 50_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("standard", n), &n, |b, &n| {
            let mut set = corpus(n);
            let query = Query::new("crsch");
            b.iter(|| {
                let mut sched = FilterScheduler::new(true);
                black_box(sched.refilter(&mut set, &query, &NeverPending))
            });
        });
        group.bench_with_input(BenchmarkId::new("edit_distance", n), &n, |b, &n| {
            let mut set = corpus(n);
            let query = Query::new("shceduler").with_mode(MatchMode::EditDistance);
            b.iter(|| {
                let mut sched = FilterScheduler::new(true);
                black_box(sched.refilter(&mut set, &query, &NeverPending))
            });
        });
    }
    group.finish();
}

fn bench_typing_burst(c: &mut Criterion) {
    // Growing query: later passes only revisit earlier matches.
    let typed = ["s", "sc", "sch", "sche", "sched"];
    c.bench_function("typing_burst_10k", |b| {
        let mut set = corpus(10_000);
        b.iter(|| {
            let mut sched = FilterScheduler::new(true);
            for q in typed {
                black_box(sched.refilter(&mut set, &Query::new(q), &NeverPending));
            }
        });
    });
}

criterion_group!(benches, bench_full_pass, bench_typing_burst);
criterion_main!(benches);
