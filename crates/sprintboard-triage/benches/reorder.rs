use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sprintboard_core::release::{ReleaseState, ReleaseTag, Version};
use sprintboard_triage::reorder::longest_increasing_subsequence;
use sprintboard_triage::{ColumnEntry, plan_reorder};

const SIZES: [usize; 4] = [50, 500, 5_000, 50_000];

/// A column where roughly one item in `disorder` is out of place.
fn column(size: usize, disorder: u64, seed: u64) -> Vec<ColumnEntry> {
    let mut state = seed;
    (0..size)
        .map(|i| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let minor = if (state >> 33) % disorder == 0 {
                u32::try_from((state >> 40) % 64).unwrap_or(0)
            } else {
                u32::try_from(i * 64 / size).unwrap_or(0)
            };
            let tag =
                ReleaseTag::new(ReleaseState::Committed, "core", Version::new(3, minor, 0, 0));
            #[allow(clippy::cast_precision_loss)]
            let position = (i + 1) as f64 * 1024.0;
            ColumnEntry::new(format!("i{i}"), position, Some(tag))
        })
        .collect()
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder.plan");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));

        let nearly_sorted = column(size, 20, 0x5EED);
        group.bench_with_input(
            BenchmarkId::new("nearly_sorted", size),
            &nearly_sorted,
            |b, entries| b.iter(|| black_box(plan_reorder(entries))),
        );

        let shuffled = column(size, 1, 0x5EED);
        group.bench_with_input(
            BenchmarkId::new("shuffled", size),
            &shuffled,
            |b, entries| b.iter(|| black_box(plan_reorder(entries))),
        );
    }

    group.finish();
}

fn bench_lis(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder.lis");

    for size in SIZES {
        let seq: Vec<usize> = (0..size).map(|i| (i * 7_919) % size).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &seq, |b, seq| {
            b.iter(|| black_box(longest_increasing_subsequence(seq)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan, bench_lis);
criterion_main!(benches);
