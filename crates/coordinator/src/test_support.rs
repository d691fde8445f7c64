// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles for the coordinator's collaborators. Shared between the
//! crate's own unit tests and the `tests/` integration suite (enabled via
//! the `test-support` feature).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{oneshot, Notify};

use crate::cache::ThreadCacheHandle;
use crate::engine::{EngineParams, StatusPoster, SyncEngine, SyncResult};
use crate::error::CacheInvalidationError;

#[derive(Debug, Error)]
#[error("fake engine error: {0}")]
pub struct FakeEngineError(pub String);

enum Step {
    Immediate(Result<SyncResult, FakeEngineError>),
    Paused(oneshot::Receiver<Result<SyncResult, FakeEngineError>>),
}

struct EngineState {
    steps: VecDeque<Step>,
    invocations: Vec<Option<Arc<dyn StatusPoster>>>,
}

/// A controllable [`SyncEngine`] double.
///
/// By default every call returns immediately with an empty [`SyncResult`].
/// Script a specific outcome with [`push_result`]/[`push_error`], or
/// suspend a call mid-pass with [`pause_next`] to drive hand-written
/// interleavings: pair it with [`wait_entered`] to know the call has
/// actually reached (and is now blocked inside) the engine before you
/// issue the next caller.
///
/// [`push_result`]: FakeEngine::push_result
/// [`push_error`]: FakeEngine::push_error
/// [`pause_next`]: FakeEngine::pause_next
/// [`wait_entered`]: FakeEngine::wait_entered
pub struct FakeEngine {
    state: Mutex<EngineState>,
    call_count: AtomicU32,
    entered: Notify,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState { steps: VecDeque::new(), invocations: Vec::new() }),
            call_count: AtomicU32::new(0),
            entered: Notify::new(),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn push_result(&self, result: SyncResult) {
        self.state.lock().steps.push_back(Step::Immediate(Ok(result)));
    }

    pub fn push_error(&self, error: FakeEngineError) {
        self.state.lock().steps.push_back(Step::Immediate(Err(error)));
    }

    /// Arrange for the next `run_sync` call to block until the returned
    /// sender is used to resolve it.
    pub fn pause_next(&self) -> oneshot::Sender<Result<SyncResult, FakeEngineError>> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().steps.push_back(Step::Paused(rx));
        tx
    }

    /// Wait for a call to have entered `run_sync` at least once since the
    /// last time this was awaited.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// The status poster each call was invoked with, in call order.
    pub fn status_posters(&self) -> Vec<Option<Arc<dyn StatusPoster>>> {
        self.state.lock().invocations.clone()
    }
}

#[async_trait]
impl SyncEngine<(), (), (), ()> for FakeEngine {
    type Error = FakeEngineError;

    async fn run_sync(
        &self,
        params: EngineParams<(), (), (), ()>,
    ) -> Result<SyncResult, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let step = {
            let mut state = self.state.lock();
            state.invocations.push(params.status_poster.clone());
            state.steps.pop_front()
        };
        self.entered.notify_one();

        match step {
            None => Ok(SyncResult::default()),
            Some(Step::Immediate(result)) => result,
            Some(Step::Paused(rx)) => {
                rx.await.unwrap_or_else(|_| Err(FakeEngineError("resume sender dropped".into())))
            }
        }
    }
}

#[async_trait]
impl SyncEngine<(), (), (), ()> for Arc<FakeEngine> {
    type Error = FakeEngineError;

    async fn run_sync(
        &self,
        params: EngineParams<(), (), (), ()>,
    ) -> Result<SyncResult, Self::Error> {
        self.as_ref().run_sync(params).await
    }
}

/// A thread-cache double that counts invalidations and can be made to fail
/// on demand.
#[derive(Default)]
pub struct FakeCache {
    invalidations: AtomicU32,
    fail_next: Mutex<bool>,
}

impl FakeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidation_count(&self) -> u32 {
        self.invalidations.load(Ordering::SeqCst)
    }

    pub fn fail_next_invalidation(&self) {
        *self.fail_next.lock() = true;
    }
}

#[async_trait]
impl ThreadCacheHandle for FakeCache {
    async fn invalidate(&self) -> Result<(), CacheInvalidationError> {
        let mut fail_next = self.fail_next.lock();
        if *fail_next {
            *fail_next = false;
            return Err(CacheInvalidationError("forced failure".into()));
        }
        drop(fail_next);
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ThreadCacheHandle for Arc<FakeCache> {
    async fn invalidate(&self) -> Result<(), CacheInvalidationError> {
        self.as_ref().invalidate().await
    }
}

/// A status poster double that records every message it was asked to post.
#[derive(Default)]
pub struct FakeStatusPoster {
    posted: Mutex<Vec<String>>,
}

impl FakeStatusPoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().clone()
    }
}

#[async_trait]
impl StatusPoster for FakeStatusPoster {
    async fn post(&self, message: &str) {
        self.posted.lock().push(message.to_string());
    }
}
