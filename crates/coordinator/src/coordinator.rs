// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The coordinator façade: the public entry points `sync`, `suppress_sync`,
//! and the configuration mutators. Binds the suppression register, the
//! coalescing register, and the clock together around a single scheduling
//! context guarded by one mutex (see the concurrency model).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use syncd_core::{Clock, SyncLog};

use crate::cache::ThreadCacheHandle;
use crate::coalesce::{CoalescedIntent, InFlight, SyncOrigin};
use crate::constants::{CATCH_UP_EPSILON, DEFERRED_CLOSE_RETRY_DELAY};
use crate::engine::{EngineParams, StatusPoster, SyncEngine, SyncResult};
use crate::runtime_handle::RuntimeHandle;
use crate::suppression::SuppressionState;
use crate::tagmap::TagMapLoader;

/// Combined scheduling state: the in-flight register and the suppression
/// register. Both are mutated only from `sync`'s check-and-set path and
/// from the completion path, all under this one lock, so the "atomic
/// check-and-set" invariant in the concurrency model holds without a
/// separate actor.
#[derive(Default)]
struct SchedulingState {
    in_flight: InFlight,
    suppression: SuppressionState,
}

/// Constructor options for [`Coordinator`]. Everything here is set once at
/// construction except the fields the façade exposes setters for
/// (`auto_tag_model`, `runtime`) and `tag_map`, which the tag-map loader
/// rewrites in place before each pass.
pub struct CoordinatorOptions<Client, Guild, Store, Runtime, Eng, Cache, Sched, Clk, Loader> {
    pub forum_id: String,
    pub tag_map: HashMap<String, String>,
    pub tag_map_path: Option<PathBuf>,
    pub task_store: Store,
    pub client: Client,
    pub guild: Guild,
    pub log: SyncLog,
    pub auto_tag: bool,
    pub auto_tag_model: String,
    pub runtime: Runtime,
    pub engine: Eng,
    pub cache: Cache,
    pub scheduler: Sched,
    pub clock: Clk,
    pub tag_map_loader: Loader,
    pub sidebar_mention_user_id: Option<String>,
}

struct Inner<Client, Guild, Store, Runtime, Eng, Cache, Sched, Clk, Loader> {
    forum_id: String,
    tag_map: Mutex<HashMap<String, String>>,
    tag_map_path: Option<PathBuf>,
    task_store: Store,
    client: Client,
    guild: Guild,
    log: SyncLog,
    auto_tag: bool,
    auto_tag_model: Mutex<String>,
    runtime: Mutex<Runtime>,
    sidebar_mention_user_id: Option<String>,
    engine: Eng,
    cache: Cache,
    scheduler: Sched,
    clock: Clk,
    tag_map_loader: Loader,
    state: Mutex<SchedulingState>,
}

/// The concurrency core: single-flight coalescing, origin-aware
/// suppression, and deferred-close retry around one opaque sync engine.
///
/// Cheap to clone — clones share the same underlying state via `Arc`, which
/// is what lets a spawned follow-up or timer re-enter the same scheduling
/// path as a fresh caller.
pub struct Coordinator<Client, Guild, Store, Runtime, Eng, Cache, Sched, Clk, Loader> {
    inner: Arc<Inner<Client, Guild, Store, Runtime, Eng, Cache, Sched, Clk, Loader>>,
}

impl<Client, Guild, Store, Runtime, Eng, Cache, Sched, Clk, Loader> Clone
    for Coordinator<Client, Guild, Store, Runtime, Eng, Cache, Sched, Clk, Loader>
{
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<Client, Guild, Store, Runtime, Eng, Cache, Sched, Clk, Loader>
    Coordinator<Client, Guild, Store, Runtime, Eng, Cache, Sched, Clk, Loader>
where
    Client: Clone + Send + Sync + 'static,
    Guild: Clone + Send + Sync + 'static,
    Store: Clone + Send + Sync + 'static,
    Runtime: Clone + Send + Sync + 'static,
    Eng: SyncEngine<Client, Guild, Store, Runtime>,
    Cache: ThreadCacheHandle,
    Sched: RuntimeHandle,
    Clk: Clock,
    Loader: TagMapLoader,
{
    pub fn new(
        options: CoordinatorOptions<Client, Guild, Store, Runtime, Eng, Cache, Sched, Clk, Loader>,
    ) -> Self {
        let inner = Inner {
            forum_id: options.forum_id,
            tag_map: Mutex::new(options.tag_map),
            tag_map_path: options.tag_map_path,
            task_store: options.task_store,
            client: options.client,
            guild: options.guild,
            log: options.log,
            auto_tag: options.auto_tag,
            auto_tag_model: Mutex::new(options.auto_tag_model),
            runtime: Mutex::new(options.runtime),
            sidebar_mention_user_id: options.sidebar_mention_user_id,
            engine: options.engine,
            cache: options.cache,
            scheduler: options.scheduler,
            clock: options.clock,
            tag_map_loader: options.tag_map_loader,
            state: Mutex::new(SchedulingState::default()),
        };
        Self { inner: Arc::new(inner) }
    }

    pub fn forum_id(&self) -> &str {
        &self.inner.forum_id
    }

    /// Run (or coalesce into, or suppress) one sync pass.
    ///
    /// Returns `Some(result)` if this call's invocation of the engine ran
    /// and completed; `None` if the call was suppressed or coalesced into
    /// someone else's pass. A coalesced caller never learns the outcome of
    /// the follow-up it triggered — see the design notes on why that's an
    /// intentional simplification, not an oversight.
    pub async fn sync(
        &self,
        status_poster: Option<Arc<dyn StatusPoster>>,
        origin: SyncOrigin,
    ) -> Result<Option<SyncResult>, Eng::Error> {
        let now = self.inner.clock.now();

        // Steps 1-3 of the façade contract: suppression check, then
        // coalescing check, then entering in-flight — all one atomic
        // check-and-set under the scheduling lock, with no suspension in
        // between (neither branch below awaits anything).
        let entered = {
            let mut state = self.inner.state.lock();

            if origin == SyncOrigin::Watcher && state.suppression.is_blocking(now) {
                if let Some(until) = state.suppression.until() {
                    if state.suppression.mark_catch_up_queued_if_needed() {
                        self.schedule_catch_up(until);
                    }
                }
                false
            } else if state.in_flight.try_enter() {
                true
            } else {
                state.in_flight.coalesce(status_poster.clone(), origin);
                false
            }
        };

        if !entered {
            return Ok(None);
        }

        self.run_pass(status_poster).await.map(Some)
    }

    /// Open (or extend) a suppression window: watcher-origin syncs arriving
    /// before `now + window_ms` are deferred until it closes, with one
    /// catch-up pass guaranteed at the end.
    pub fn suppress_sync(&self, window_ms: u64) {
        let until = self.inner.clock.now() + std::time::Duration::from_millis(window_ms);
        self.inner.state.lock().suppression.suppress(until);
    }

    pub fn set_auto_tag_model(&self, model: impl Into<String>) {
        *self.inner.auto_tag_model.lock() = model.into();
    }

    pub fn set_runtime(&self, runtime: Runtime) {
        *self.inner.runtime.lock() = runtime;
    }

    /// Steps 4-8 of the façade contract: reload the tag map, snapshot
    /// parameters, invoke the engine, and react to success or failure. The
    /// caller has already entered the in-flight slot.
    async fn run_pass(
        &self,
        status_poster: Option<Arc<dyn StatusPoster>>,
    ) -> Result<SyncResult, Eng::Error> {
        if let Some(path) = &self.inner.tag_map_path {
            match self.inner.tag_map_loader.load(path).await {
                Ok(fresh) => *self.inner.tag_map.lock() = fresh,
                Err(err) => {
                    self.inner.log.warn_with_error("tag-map reload failed; using cached map", &err);
                }
            }
        }

        let params = EngineParams {
            client: self.inner.client.clone(),
            guild: self.inner.guild.clone(),
            forum_id: self.inner.forum_id.clone(),
            tag_map: self.inner.tag_map.lock().clone(),
            task_store: self.inner.task_store.clone(),
            log: self.inner.log.clone(),
            status_poster,
            mention_user_id: self.inner.sidebar_mention_user_id.clone(),
            auto_tag: self.inner.auto_tag,
            auto_tag_model: self.inner.auto_tag_model.lock().clone(),
            runtime: self.inner.runtime.lock().clone(),
        };

        match self.inner.engine.run_sync(params).await {
            Ok(result) => {
                if let Err(err) = self.inner.cache.invalidate().await {
                    self.inner.log.warn_with_error("thread cache invalidation failed", &err);
                }

                if result.closes_deferred > 0 {
                    self.schedule_deferred_close_retry();
                }

                let coalesced = self.inner.state.lock().in_flight.clear();
                if let Some(intent) = coalesced {
                    self.spawn_follow_up(intent);
                }

                Ok(result)
            }
            Err(err) => {
                // Engine failure: clear in-flight so the next caller can
                // retry, but never invalidate the cache and never spawn a
                // follow-up, even if callers coalesced in the meantime.
                self.inner.state.lock().in_flight.clear();
                Err(err)
            }
        }
    }

    fn spawn_follow_up(&self, intent: CoalescedIntent) {
        let this = self.clone();
        self.inner.scheduler.spawn(Box::pin(async move {
            if let Err(err) = this.sync(intent.status_poster, intent.origin).await {
                this.inner.log.warn_with_error("coordinator follow-up sync failed", &err);
            }
        }));
    }

    fn schedule_deferred_close_retry(&self) {
        let this = self.clone();
        let fire_at = self.inner.clock.now() + DEFERRED_CLOSE_RETRY_DELAY;
        self.inner.scheduler.spawn(Box::pin(async move {
            this.inner.clock.sleep_until(fire_at).await;
            if let Err(err) = this.sync(None, SyncOrigin::User).await {
                this.inner.log.warn_with_error("coordinator deferred-close retry failed", &err);
            }
        }));
    }

    fn schedule_catch_up(&self, until: std::time::Instant) {
        let this = self.clone();
        let fire_at = until + CATCH_UP_EPSILON;
        self.inner.scheduler.spawn(Box::pin(async move {
            this.inner.clock.sleep_until(fire_at).await;
            if let Err(err) = this.sync(None, SyncOrigin::Watcher).await {
                this.inner.log.warn_with_error("coordinator catch-up sync failed", &err);
            }
        }));
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
