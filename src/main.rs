/*!
 * Reentrant RW Lock - Demo Entry Point
 *
 * Drives a mixed reader/writer workload through a `TxCache`:
 * - Reader threads take consistent multi-key snapshots
 * - Writer threads commit transactions that move value between keys
 * - A counter thread performs reentrant read-modify-write updates
 *
 * The invariant checked by every reader is that the sum over all keys never
 * changes, which only holds if commits are exclusive with readers.
 */

use anyhow::{bail, Context, Result};
use reentrant_rwlock::monitoring::span_operation;
use reentrant_rwlock::{init_tracing, MemoryStore, StrategyType, SyncConfig, TxCache};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

const ACCOUNTS: usize = 8;
const INITIAL_BALANCE: u64 = 100;
const READERS: usize = 4;
const WRITERS: usize = 2;
const ROUNDS: usize = 500;

fn account_key(i: usize) -> String {
    format!("account:{i}")
}

fn parse_balance(value: Option<String>) -> Result<u64> {
    value
        .context("account missing")?
        .parse()
        .context("balance is not a number")
}

fn main() -> Result<()> {
    // Initialize structured tracing
    init_tracing();

    let strategy = match std::env::var("RRWL_STRATEGY") {
        Ok(raw) => raw.parse::<StrategyType>().map_err(anyhow::Error::msg)?,
        Err(_) => StrategyType::Auto,
    };
    let config = SyncConfig {
        strategy,
        ..Default::default()
    };

    let store = MemoryStore::with_rows(
        (0..ACCOUNTS).map(|i| (account_key(i), INITIAL_BALANCE.to_string())),
    );
    let cache = Arc::new(TxCache::with_config(store, config));
    info!(
        strategy = cache.lock().strategy_name(),
        accounts = ACCOUNTS,
        "Cache ready"
    );

    let expected_total = ACCOUNTS as u64 * INITIAL_BALANCE;
    let keys: Vec<String> = (0..ACCOUNTS).map(account_key).collect();

    let span = span_operation("workload");
    let _entered = span.enter();

    let mut handles = Vec::new();

    for reader in 0..READERS {
        let cache = cache.clone();
        let keys = keys.clone();
        handles.push(thread::spawn(move || -> Result<()> {
            let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
            for _ in 0..ROUNDS {
                let mut total = 0;
                for value in cache.get_many(&key_refs)? {
                    total += parse_balance(value)?;
                }
                if total != expected_total {
                    bail!("reader {reader} saw total {total}, expected {expected_total}");
                }
            }
            Ok(())
        }));
    }

    for writer in 0..WRITERS {
        let cache = cache.clone();
        handles.push(thread::spawn(move || -> Result<()> {
            for round in 0..ROUNDS {
                let from = account_key((writer + round) % ACCOUNTS);
                let to = account_key((writer + round + 1) % ACCOUNTS);

                // Hold exclusive access across read and commit so the
                // balances read are the ones overwritten
                let _write = cache.lock().write();
                cache.begin_transaction()?;
                let from_balance = parse_balance(cache.get(&from)?)?;
                let to_balance = parse_balance(cache.get(&to)?)?;
                if from_balance == 0 {
                    cache.abort_transaction();
                    continue;
                }
                cache.set(from.as_str(), (from_balance - 1).to_string())?;
                cache.set(to.as_str(), (to_balance + 1).to_string())?;
                cache.commit_transaction()?;
            }
            Ok(())
        }));
    }

    {
        let cache = cache.clone();
        handles.push(thread::spawn(move || -> Result<()> {
            for _ in 0..ROUNDS {
                cache.update("counter", |value| {
                    let n: u64 = value.and_then(|v| v.parse().ok()).unwrap_or(0);
                    Some((n + 1).to_string())
                })?;
            }
            Ok(())
        }));
    }

    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => bail!("worker thread panicked"),
        }
    }

    let counter = cache.get_committed("counter")?;
    if counter.as_deref() != Some(ROUNDS.to_string().as_str()) {
        warn!(?counter, "counter lost updates");
    }

    info!(stats = ?cache.lock().stats(), "Workload finished");
    println!("{}", serde_json::to_string_pretty(&cache.lock().snapshot())?);
    Ok(())
}
