use core::{future::Future, hint::black_box};
use criterion::async_executor::SmolExecutor;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use segid::{Loader, MemoryLoader, Options, Result, SegmentGenerator, Spawner, ThreadSpawner};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};
use tokio::runtime::Builder;

/// Renews on the calling thread so every boundary pays for the full load and
/// install.
#[derive(Clone, Copy)]
struct InlineSpawner;

impl Spawner for InlineSpawner {
    fn spawn<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        futures::executor::block_on(task);
        Ok(())
    }
}

// Number of IDs generated per benchmark iteration (split across threads for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn loaded<S: Spawner>(spawner: S, options: &Options) -> SegmentGenerator<MemoryLoader, S> {
    let generator = SegmentGenerator::with_spawner(MemoryLoader::new(0), spawner, options).unwrap();
    generator.load_initial_blocking().unwrap();
    generator
}

/// Benchmarks the hot path where no boundary is ever crossed.
fn bench_generator<L, S>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> SegmentGenerator<L, S>,
) where
    L: Loader,
    S: Spawner,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let mut elapsed = core::time::Duration::ZERO;

            for _ in 0..iters {
                let generator = generator_factory();
                let start = Instant::now();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
                elapsed += start.elapsed();
            }

            elapsed
        });
    });

    group.finish();
}

/// Benchmarks one generator shared across threads.
fn bench_generator_contended<L, S>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> SegmentGenerator<L, S>,
) where
    L: Loader,
    S: Spawner,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = Arc::new(generator_factory());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        black_box(generator.next_id().unwrap());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

/// Benchmarks explicit loads driven by an async runtime.
fn bench_load_tokio(c: &mut Criterion, group_name: &str) {
    let rt = Builder::new_current_thread().build().unwrap();
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("loads/{}", TOTAL_IDS), |b| {
        b.to_async(&rt).iter_custom(|iters| async move {
            let generator = SegmentGenerator::new(MemoryLoader::new(0), &Options::new()).unwrap();
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..TOTAL_IDS {
                    black_box(generator.load_initial().await.unwrap());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

fn bench_load_smol(c: &mut Criterion, group_name: &str) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("loads/{}", TOTAL_IDS), |b| {
        b.to_async(SmolExecutor).iter_custom(|iters| async move {
            let generator = SegmentGenerator::new(MemoryLoader::new(0), &Options::new()).unwrap();
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..TOTAL_IDS {
                    black_box(generator.load_initial().await.unwrap());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

fn benchmark_sequential(c: &mut Criterion) {
    bench_generator(c, "memory/sequential", || {
        loaded(ThreadSpawner, &Options::new())
    });
}

fn benchmark_sequential_renewing(c: &mut Criterion) {
    // a boundary every 256 increments, renewed inline
    let options = Options::new()
        .with_low_bits(16)
        .with_renew_interval(256)
        .with_critical_value(1);
    bench_generator(c, "memory/sequential/renewing", || {
        loaded(InlineSpawner, &options)
    });
}

fn benchmark_contended(c: &mut Criterion) {
    bench_generator_contended(c, "memory/contended", || {
        loaded(ThreadSpawner, &Options::new())
    });
}

fn benchmark_contended_renewing(c: &mut Criterion) {
    let options = Options::new()
        .with_low_bits(16)
        .with_renew_interval(256)
        .with_critical_value(1);
    bench_generator_contended(c, "memory/contended/renewing", || {
        loaded(InlineSpawner, &options)
    });
}

fn benchmark_load_tokio(c: &mut Criterion) {
    bench_load_tokio(c, "memory/load/tokio");
}

fn benchmark_load_smol(c: &mut Criterion) {
    bench_load_smol(c, "memory/load/smol");
}

criterion_group!(
    benches,
    // Hot path
    benchmark_sequential,
    benchmark_contended,
    // Renewals on every 256th id
    benchmark_sequential_renewing,
    benchmark_contended_renewing,
    // Explicit loads
    benchmark_load_tokio,
    benchmark_load_smol,
);
criterion_main!(benches);
