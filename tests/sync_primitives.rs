/*!
 * Synchronization Primitives Integration Tests
 *
 * Tests for the condvar and spinwait strategies behind the lock
 */

use parking_lot::Mutex;
use reentrant_rwlock::core::sync::{
    CondvarWait, SpinWait, StrategyType, SyncConfig, WaitEvent, WaitStrategy, Waiter, WakeResult,
};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn shared<W: WaitStrategy>(waiter: W) -> Arc<(Mutex<u64>, W)> {
    Arc::new((Mutex::new(0), waiter))
}

#[test]
fn test_condvar_single_waiter() {
    let state = shared(CondvarWait::new());
    let state_clone = state.clone();

    let handle = thread::spawn(move || {
        let (mutex, cv) = &*state_clone;
        let start = Instant::now();
        let mut guard = mutex.lock();
        cv.wait_while(WaitEvent::WriterReleased, &mut guard, |v| *v == 0);
        start.elapsed()
    });

    // Give thread time to park
    thread::sleep(Duration::from_millis(50));
    assert_eq!(state.1.waiter_count(WaitEvent::WriterReleased), 1);

    *state.0.lock() = 1;
    let woken = state.1.notify(WaitEvent::WriterReleased);
    assert_eq!(woken, WakeResult::Woken(1));

    let elapsed = handle.join().unwrap();
    assert!(elapsed < Duration::from_millis(500));
}

#[test]
fn test_condvar_events_are_independent() {
    let state = shared(CondvarWait::new());
    let state_clone = state.clone();

    let handle = thread::spawn(move || {
        let (mutex, cv) = &*state_clone;
        let mut guard = mutex.lock();
        cv.wait_while(WaitEvent::ReadersDrained, &mut guard, |v| *v < 2);
    });

    thread::sleep(Duration::from_millis(50));

    // Notifying the other event wakes nobody
    *state.0.lock() = 2;
    assert_eq!(state.1.notify(WaitEvent::WriterReleased), WakeResult::NoWaiters);
    assert_eq!(state.1.waiter_count(WaitEvent::ReadersDrained), 1);

    state.1.notify(WaitEvent::ReadersDrained);
    handle.join().unwrap();
}

#[test]
fn test_condvar_spurious_notify_rechecks_condition() {
    let state = shared(CondvarWait::new());
    let state_clone = state.clone();

    let handle = thread::spawn(move || {
        let (mutex, cv) = &*state_clone;
        let mut guard = mutex.lock();
        cv.wait_while(WaitEvent::WriterReleased, &mut guard, |v| *v < 3);
        *guard
    });

    for i in 1..=3 {
        thread::sleep(Duration::from_millis(30));
        *state.0.lock() = i;
        state.1.notify(WaitEvent::WriterReleased);
    }

    assert_eq!(handle.join().unwrap(), 3);
}

#[test]
fn test_spinwait_low_latency() {
    let state = shared(SpinWait::new(Duration::from_micros(100), 1000));
    let state_clone = state.clone();

    let handle = thread::spawn(move || {
        let (mutex, sw) = &*state_clone;
        let mut guard = mutex.lock();
        sw.wait_while(WaitEvent::WriterReleased, &mut guard, |v| *v == 0);
    });

    thread::sleep(Duration::from_millis(10));
    *state.0.lock() = 1;
    handle.join().unwrap();
}

#[test]
fn test_spinwait_many_pollers() {
    let state = shared(SpinWait::with_defaults());

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let state_clone = state.clone();
            thread::spawn(move || {
                let (mutex, sw) = &*state_clone;
                let mut guard = mutex.lock();
                sw.wait_while(WaitEvent::WriterReleased, &mut guard, |v| *v == 0);
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(100));
    assert!(state.1.notify(WaitEvent::WriterReleased).count() <= 5);

    *state.0.lock() = 1;
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(state.1.waiter_count(WaitEvent::WriterReleased), 0);
}

#[test]
fn test_strategy_auto_selection() {
    let config = SyncConfig {
        strategy: StrategyType::Auto,
        ..Default::default()
    };
    assert_eq!(Waiter::new(&config).name(), "condvar");
    assert_eq!(Waiter::new(&SyncConfig::low_latency()).name(), "spinwait");
    assert_eq!(Waiter::new(&SyncConfig::long_wait()).name(), "condvar");
}

#[test]
fn test_waiter_dispatch_wakes() {
    for config in [SyncConfig::default(), SyncConfig::low_latency()] {
        let state = shared(Waiter::new(&config));
        let state_clone = state.clone();

        let handle = thread::spawn(move || {
            let (mutex, waiter) = &*state_clone;
            let mut guard = mutex.lock();
            waiter.wait_while(WaitEvent::ReadersDrained, &mut guard, |v| *v == 0);
        });

        thread::sleep(Duration::from_millis(20));
        *state.0.lock() = 1;
        state.1.notify(WaitEvent::ReadersDrained);
        handle.join().unwrap();
    }
}
