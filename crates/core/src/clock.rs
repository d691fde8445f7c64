// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! Beyond `now()`, this clock also owns single-shot timer suspension via
//! `sleep_until`, so the coordinator's deferred-close retry and suppression
//! catch-up can be driven by a [`FakeClock`] in tests instead of real wall
//! time.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::oneshot;

/// A clock that provides the current time and single-shot timer suspension.
#[async_trait]
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn epoch_ms(&self) -> u64;

    /// Suspend the calling task until `instant` is reached. Returns
    /// immediately if `instant` is already in the past.
    async fn sleep_until(&self, instant: Instant);
}

/// Real system clock, backed by `tokio::time::sleep_until`.
#[derive(Clone, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(tokio::time::Instant::from_std(instant)).await;
    }
}

#[cfg(any(test, feature = "test-support"))]
struct Waiter {
    fire_at: Instant,
    tx: Option<oneshot::Sender<()>>,
}

#[cfg(any(test, feature = "test-support"))]
struct FakeClockInner {
    current: Instant,
    epoch_ms: u64,
    waiters: Vec<Waiter>,
}

/// Fake clock for testing with controllable time.
///
/// `advance`/`set` wake any pending `sleep_until` callers whose deadline has
/// now passed, so tests can drive the coordinator's timers deterministically
/// instead of waiting on real sleeps.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeClockInner>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeClock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeClockInner {
                current: Instant::now(),
                epoch_ms: 1_000_000,
                waiters: Vec::new(),
            })),
        }
    }

    /// Advance the clock by the given duration, firing any due timers.
    pub fn advance(&self, duration: Duration) {
        let mut inner = self.inner.lock();
        inner.current += duration;
        inner.epoch_ms += duration.as_millis() as u64;
        let now = inner.current;
        inner.waiters.retain_mut(|w| {
            if w.fire_at <= now {
                if let Some(tx) = w.tx.take() {
                    let _ = tx.send(());
                }
                false
            } else {
                true
            }
        });
    }

    /// Set the clock to a specific instant, firing any now-due timers.
    pub fn set(&self, instant: Instant) {
        let mut inner = self.inner.lock();
        inner.current = instant;
        inner.waiters.retain_mut(|w| {
            if w.fire_at <= instant {
                if let Some(tx) = w.tx.take() {
                    let _ = tx.send(());
                }
                false
            } else {
                true
            }
        });
    }

    /// Set the epoch milliseconds value
    pub fn set_epoch_ms(&self, ms: u64) {
        self.inner.lock().epoch_ms = ms;
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.inner.lock().current
    }

    fn epoch_ms(&self) -> u64 {
        self.inner.lock().epoch_ms
    }

    async fn sleep_until(&self, instant: Instant) {
        let rx = {
            let mut inner = self.inner.lock();
            if instant <= inner.current {
                return;
            }
            let (tx, rx) = oneshot::channel();
            inner.waiters.push(Waiter { fire_at: instant, tx: Some(tx) });
            rx
        };
        // The sender is buffered regardless of send/await ordering, so this
        // cannot miss a wakeup that races with `advance`/`set`.
        let _ = rx.await;
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
