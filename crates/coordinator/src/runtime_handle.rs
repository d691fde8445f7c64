// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Abstraction over the host async runtime, used only to spawn the
//! fire-and-forget follow-up, deferred-close retry, and suppression
//! catch-up passes (see the concurrency model). The coordinator never
//! awaits a spawned task directly — by design, a coalescing caller does not
//! receive a promise of the follow-up result.

use std::future::Future;
use std::pin::Pin;

pub type BoxedFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

pub trait RuntimeHandle: Clone + Send + Sync + 'static {
    fn spawn(&self, fut: BoxedFuture);
}

/// The default runtime handle, backed by `tokio::spawn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRuntimeHandle;

impl RuntimeHandle for TokioRuntimeHandle {
    fn spawn(&self, fut: BoxedFuture) {
        tokio::spawn(fut);
    }
}

#[cfg(test)]
#[path = "runtime_handle_tests.rs"]
mod tests;
