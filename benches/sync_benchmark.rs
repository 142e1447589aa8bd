/*!
 * Synchronization Primitives Benchmarks
 *
 * Compare the condvar and spinwait strategies behind the reentrant lock
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reentrant_rwlock::{ReentrantRwLock, StrategyType, SyncConfig};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const STRATEGIES: [StrategyType; 2] = [StrategyType::Condvar, StrategyType::SpinWait];

fn config_for(strategy: StrategyType) -> SyncConfig {
    SyncConfig {
        strategy,
        ..Default::default()
    }
}

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    let lock = ReentrantRwLock::new();

    group.bench_function("shared", |b| {
        b.iter(|| {
            lock.acquire_shared();
            lock.release_shared().unwrap();
        });
    });

    group.bench_function("exclusive", |b| {
        b.iter(|| {
            lock.acquire_exclusive();
            lock.release_exclusive().unwrap();
        });
    });

    group.bench_function("recursive_exclusive_depth_4", |b| {
        b.iter(|| {
            for _ in 0..4 {
                lock.acquire_exclusive();
            }
            for _ in 0..4 {
                lock.release_exclusive().unwrap();
            }
        });
    });

    group.finish();
}

fn bench_writer_handoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("writer_handoff");

    for strategy in STRATEGIES {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", strategy)),
            &strategy,
            |b, &strategy| {
                b.iter(|| {
                    let lock = Arc::new(ReentrantRwLock::with_config(config_for(strategy)));
                    lock.acquire_exclusive();

                    let lock_clone = lock.clone();
                    let handle = thread::spawn(move || {
                        lock_clone.acquire_exclusive();
                        lock_clone.release_exclusive().unwrap();
                    });

                    // Immediate release
                    lock.release_exclusive().unwrap();
                    handle.join().unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_read_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_heavy");

    for strategy in STRATEGIES {
        for readers in [2usize, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", strategy), readers),
                &readers,
                |b, &readers| {
                    let lock = Arc::new(ReentrantRwLock::with_config(config_for(strategy)));

                    b.iter(|| {
                        let handles: Vec<_> = (0..readers)
                            .map(|i| {
                                let lock = lock.clone();
                                thread::spawn(move || {
                                    for n in 0..100 {
                                        if (i + n) % 50 == 0 {
                                            let _write = lock.write();
                                        } else {
                                            let _read = lock.read();
                                        }
                                    }
                                })
                            })
                            .collect();

                        for handle in handles {
                            handle.join().unwrap();
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_spin_vs_park(c: &mut Criterion) {
    let mut group = c.benchmark_group("spin_vs_park");

    for hold_us in [1u64, 10, 100] {
        for strategy in STRATEGIES {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", strategy), hold_us),
                &hold_us,
                |b, &hold_us| {
                    let lock = Arc::new(ReentrantRwLock::with_config(config_for(strategy)));

                    b.iter(|| {
                        lock.acquire_exclusive();
                        let lock_clone = lock.clone();
                        let handle = thread::spawn(move || {
                            let _read = lock_clone.read();
                        });

                        thread::sleep(Duration::from_micros(hold_us));
                        lock.release_exclusive().unwrap();
                        handle.join().unwrap();
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_try_acquire_fail(c: &mut Criterion) {
    c.bench_function("try_acquire_exclusive_fail", |b| {
        let lock = Arc::new(ReentrantRwLock::new());
        let lock_clone = lock.clone();
        // Hold shared access on another thread for the whole benchmark
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<()>();
        let holder = thread::spawn(move || {
            let _read = lock_clone.read();
            ready_tx.send(()).unwrap();
            rx.recv().ok();
        });
        ready_rx.recv().unwrap();

        b.iter(|| black_box(lock.try_acquire_exclusive()));

        tx.send(()).unwrap();
        holder.join().unwrap();
    });
}

criterion_group!(
    benches,
    bench_uncontended,
    bench_writer_handoff,
    bench_read_heavy,
    bench_spin_vs_park,
    bench_try_acquire_fail
);

criterion_main!(benches);
