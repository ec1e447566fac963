use criterion::{criterion_group, BenchmarkId, Criterion};
use futures::{executor::block_on, stream, StreamExt};
use itertools::kmerge_by;
use rand::prelude::*;
use stream_merge::{merge, try_merge, Merged};

const SOURCE_COUNTS: [usize; 5] = [2, 8, 32, 64, 128];

fn closest_divisible<I>(iter: I, target: usize) -> usize
where
    I: Iterator<Item = usize>,
{
    fn gcd(mut a: usize, mut b: usize) -> usize {
        while b != 0 {
            (a, b) = (b, a % b);
        }
        a
    }
    fn lcm(a: usize, b: usize) -> usize {
        a.checked_mul(b).unwrap() / gcd(a, b)
    }

    let lcm = iter.fold(1, lcm);
    ((target as f64) / (lcm as f64)).round() as usize * lcm
}

/// Splits `items` into `n_sources` consecutive chunks, each sorted
fn sorted_chunks(items: &[u64], n_sources: usize) -> Vec<Vec<u64>> {
    items
        .chunks(items.len() / n_sources)
        .map(|chunk| {
            let mut chunk = chunk.to_vec();
            chunk.sort_unstable();
            chunk
        })
        .collect()
}

fn bench_itertools(c: &mut Criterion) {
    let n_els = closest_divisible(SOURCE_COUNTS.iter().copied(), 2_usize.pow(16));
    let items = StdRng::seed_from_u64(0)
        .random_iter()
        .take(n_els)
        .collect::<Vec<u64>>();

    let mut group = c.benchmark_group("Sorted sources VS Itertools");
    for n_sources in SOURCE_COUNTS {
        let chunks = sorted_chunks(&items, n_sources);
        group.bench_function(BenchmarkId::new("merge", n_sources), |b| {
            b.iter(|| {
                block_on(
                    merge(chunks.iter().map(|chunk| stream::iter(chunk.iter().copied())))
                        .collect::<Vec<_>>(),
                )
            });
        });
        group.bench_function(BenchmarkId::new("Itertools kmerge_by", n_sources), |b| {
            b.iter(|| {
                kmerge_by(
                    chunks.iter().map(|chunk| chunk.iter().copied()),
                    |a: &u64, b: &u64| a < b,
                )
                .collect::<Vec<_>>()
            });
        });
    }
    group.finish();
}

fn bench_configs(c: &mut Criterion) {
    const N_SOURCES: usize = 16;
    let n_els = 2_usize.pow(16);
    let items = StdRng::seed_from_u64(0)
        .random_iter()
        .take(n_els)
        .collect::<Vec<u64>>();
    let chunks = sorted_chunks(&items, N_SOURCES);

    let mut group = c.benchmark_group(format!("Configs ({n_els} items; {N_SOURCES} sources)"));
    group.bench_function("Ord", |b| {
        b.iter(|| {
            block_on(
                merge(chunks.iter().map(|chunk| stream::iter(chunk.iter().copied())))
                    .collect::<Vec<_>>(),
            )
        });
    });
    group.bench_function("Closure", |b| {
        b.iter(|| {
            block_on(
                Merged::new(chunks.iter().map(|chunk| stream::iter(chunk.iter().copied())))
                    .with_cmp(|a: &u64, b: &u64| a.cmp(b))
                    .build()
                    .collect::<Vec<_>>(),
            )
        });
    });
    group.bench_function("Fallible sources", |b| {
        b.iter(|| {
            block_on(
                try_merge(
                    chunks
                        .iter()
                        .map(|chunk| stream::iter(chunk.iter().copied().map(Ok::<_, ()>))),
                )
                .collect::<Vec<_>>(),
            )
        });
    });
    group.finish();
}

criterion_group!(benches, bench_itertools, bench_configs);
