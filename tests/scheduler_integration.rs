//! Integration tests for refresh scheduling behavior over real time.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use certwatch::cache::CacheStore;
use certwatch::refresh::RefreshScheduler;

use common::{item, ScriptedAccessor};

#[tokio::test]
async fn test_startup_refresh_populates_without_blocking_spawn() {
    let accessor = ScriptedAccessor::new(
        "a",
        vec![item("a", "a1", "a1.example.com", 1_735_689_600)],
    )
    .with_delay(Duration::from_millis(100));
    let store = Arc::new(CacheStore::new());

    let started = Instant::now();
    let _handle = RefreshScheduler::new(
        store.clone(),
        vec![Arc::new(accessor)],
        Duration::from_secs(3600),
        Duration::from_secs(5),
    )
    .spawn();
    assert!(started.elapsed() < Duration::from_millis(50), "spawn must not wait on the run");

    // The startup run lands shortly afterwards.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(store.get().await.len(), 1);
}

#[tokio::test]
async fn test_trigger_now_is_fire_and_forget() {
    let accessor = ScriptedAccessor::new(
        "slow",
        vec![item("slow", "s1", "s1.example.com", 1_735_689_600)],
    )
    .with_delay(Duration::from_millis(400));
    let calls = accessor.calls.clone();

    let handle = RefreshScheduler::new(
        Arc::new(CacheStore::new()),
        vec![Arc::new(accessor)],
        Duration::from_secs(3600),
        Duration::from_secs(5),
    )
    .spawn();

    // Let the startup run finish so the trigger starts a fresh run.
    tokio::time::sleep(Duration::from_millis(600)).await;

    let started = Instant::now();
    handle.trigger_now();
    assert!(started.elapsed() < Duration::from_millis(50));

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_periodic_trigger_runs_once_per_interval() {
    let accessor = ScriptedAccessor::new(
        "fast",
        vec![item("fast", "f1", "f1.example.com", 1_735_689_600)],
    );
    let calls = accessor.calls.clone();

    let handle = RefreshScheduler::new(
        Arc::new(CacheStore::new()),
        vec![Arc::new(accessor)],
        Duration::from_millis(100),
        Duration::from_secs(5),
    )
    .spawn();

    // Startup tick at t=0 plus periodic ticks at 100ms..500ms: six runs,
    // with slack for scheduling jitter.
    tokio::time::sleep(Duration::from_millis(550)).await;
    drop(handle);

    let observed = calls.load(std::sync::atomic::Ordering::SeqCst);
    assert!(
        (4..=7).contains(&observed),
        "expected roughly one run per interval tick, observed {}",
        observed
    );
}

#[tokio::test]
async fn test_sequential_triggers_each_run() {
    let accessor = ScriptedAccessor::new(
        "a",
        vec![item("a", "a1", "a1.example.com", 1_735_689_600)],
    );
    let calls = accessor.calls.clone();

    let handle = RefreshScheduler::new(
        Arc::new(CacheStore::new()),
        vec![Arc::new(accessor)],
        Duration::from_secs(3600),
        Duration::from_secs(5),
    )
    .spawn();

    // Startup run, then two well-separated manual triggers.
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.trigger_now();
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.trigger_now();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
}
