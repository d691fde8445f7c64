// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::runtime_handle::TokioRuntimeHandle;
use crate::tagmap::JsonFileTagMapLoader;
use crate::test_support::{FakeCache, FakeEngine, FakeStatusPoster};
use std::sync::Arc;
use syncd_core::{FakeClock, SyncLog};

fn new_coordinator(
    engine: Arc<FakeEngine>,
    cache: Arc<FakeCache>,
    clock: FakeClock,
) -> Coordinator<(), (), (), (), Arc<FakeEngine>, Arc<FakeCache>, TokioRuntimeHandle, FakeClock, JsonFileTagMapLoader>
{
    Coordinator::new(CoordinatorOptions {
        forum_id: "forum-1".to_string(),
        tag_map: HashMap::new(),
        tag_map_path: None,
        task_store: (),
        client: (),
        guild: (),
        log: SyncLog::test(),
        auto_tag: true,
        auto_tag_model: "claude".to_string(),
        runtime: (),
        engine,
        cache,
        scheduler: TokioRuntimeHandle,
        clock,
        tag_map_loader: JsonFileTagMapLoader,
        sidebar_mention_user_id: None,
    })
}

#[tokio::test]
async fn idle_sync_runs_the_engine_once_and_invalidates_the_cache() {
    let engine = Arc::new(FakeEngine::new());
    let cache = Arc::new(FakeCache::new());
    let clock = FakeClock::new();
    let coordinator = new_coordinator(engine.clone(), cache.clone(), clock);

    let result = coordinator.sync(None, SyncOrigin::User).await.expect("sync should succeed");
    assert!(result.is_some());
    assert_eq!(engine.call_count(), 1);
    assert_eq!(cache.invalidation_count(), 1);
}

#[tokio::test]
async fn two_successive_idle_syncs_each_invoke_the_engine_once() {
    let engine = Arc::new(FakeEngine::new());
    let cache = Arc::new(FakeCache::new());
    let clock = FakeClock::new();
    let coordinator = new_coordinator(engine.clone(), cache.clone(), clock);

    coordinator.sync(None, SyncOrigin::User).await.expect("first sync");
    coordinator.sync(None, SyncOrigin::User).await.expect("second sync");
    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn coalescing_caller_returns_none_without_invoking_the_engine_itself() {
    let engine = Arc::new(FakeEngine::new());
    let cache = Arc::new(FakeCache::new());
    let clock = FakeClock::new();
    let coordinator = new_coordinator(engine.clone(), cache.clone(), clock);

    let resume = engine.pause_next();

    let coordinator_a = coordinator.clone();
    let call_a = tokio::spawn(async move { coordinator_a.sync(None, SyncOrigin::User).await });

    engine.wait_entered().await;

    let result_b = coordinator.sync(None, SyncOrigin::Watcher).await.expect("coalesced call");
    assert!(result_b.is_none());

    resume.send(Ok(SyncResult { threads_created: 1, ..Default::default() })).expect("resume");

    let result_a = call_a.await.expect("task").expect("call a should succeed");
    assert_eq!(result_a.map(|r| r.threads_created), Some(1));

    // Give the spawned follow-up a chance to run.
    for _ in 0..20 {
        tokio::task::yield_now().await;
        if engine.call_count() >= 2 {
            break;
        }
    }
    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn engine_failure_does_not_invalidate_the_cache_and_allows_retry() {
    let engine = Arc::new(FakeEngine::new());
    let cache = Arc::new(FakeCache::new());
    let clock = FakeClock::new();
    let coordinator = new_coordinator(engine.clone(), cache.clone(), clock);

    engine.push_error(crate::test_support::FakeEngineError("boom".to_string()));
    let err = coordinator.sync(None, SyncOrigin::User).await;
    assert!(err.is_err());
    assert_eq!(cache.invalidation_count(), 0);

    let ok = coordinator.sync(None, SyncOrigin::User).await.expect("retry should succeed");
    assert!(ok.is_some());
    assert_eq!(cache.invalidation_count(), 1);
}

#[tokio::test]
async fn watcher_sync_is_suppressed_during_an_active_window() {
    let engine = Arc::new(FakeEngine::new());
    let cache = Arc::new(FakeCache::new());
    let clock = FakeClock::new();
    let coordinator = new_coordinator(engine.clone(), cache.clone(), clock);

    coordinator.suppress_sync(60_000);
    let result = coordinator.sync(None, SyncOrigin::Watcher).await.expect("suppressed call");
    assert!(result.is_none());
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn user_sync_bypasses_an_active_suppression_window() {
    let engine = Arc::new(FakeEngine::new());
    let cache = Arc::new(FakeCache::new());
    let clock = FakeClock::new();
    let coordinator = new_coordinator(engine.clone(), cache.clone(), clock);

    coordinator.suppress_sync(60_000);
    let result = coordinator.sync(None, SyncOrigin::User).await.expect("user sync");
    assert!(result.is_some());
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn status_poster_is_forwarded_to_the_engine() {
    let engine = Arc::new(FakeEngine::new());
    let cache = Arc::new(FakeCache::new());
    let clock = FakeClock::new();
    let coordinator = new_coordinator(engine.clone(), cache.clone(), clock);

    let poster: Arc<dyn StatusPoster> = Arc::new(FakeStatusPoster::new());
    coordinator.sync(Some(poster.clone()), SyncOrigin::User).await.expect("sync");

    let posters = engine.status_posters();
    assert_eq!(posters.len(), 1);
    assert!(Arc::ptr_eq(posters[0].as_ref().expect("poster forwarded"), &poster));
}

#[tokio::test]
async fn deferred_closes_schedule_exactly_one_retry_after_30_seconds() {
    let engine = Arc::new(FakeEngine::new());
    let cache = Arc::new(FakeCache::new());
    let clock = FakeClock::new();
    let coordinator = new_coordinator(engine.clone(), cache.clone(), clock.clone());

    engine.push_result(SyncResult { closes_deferred: 1, ..Default::default() });
    coordinator.sync(None, SyncOrigin::User).await.expect("first sync");
    assert_eq!(engine.call_count(), 1);

    clock.advance(std::time::Duration::from_millis(30_000));
    for _ in 0..20 {
        tokio::task::yield_now().await;
        if engine.call_count() >= 2 {
            break;
        }
    }
    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn set_auto_tag_model_and_set_runtime_do_not_panic() {
    let engine = Arc::new(FakeEngine::new());
    let cache = Arc::new(FakeCache::new());
    let clock = FakeClock::new();
    let coordinator = new_coordinator(engine, cache, clock);
    coordinator.set_auto_tag_model("gpt-5");
    coordinator.set_runtime(());
}
